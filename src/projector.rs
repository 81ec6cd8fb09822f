use crate::tween::lerp;

/// One position in the word cloud. Slot `i` always holds the word ranked
/// `i`-th, or nothing when fewer words are tracked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySlot {
    pub word: String,
    pub points: i32,
    pub style: SlotStyle,
}

/// Visual weight of a slot, interpolated from the normalized point score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SlotStyle {
    pub font_size: f32,
    pub color: (u8, u8, u8),
}

/// How a slot's content changed on a refresh. Animated changes signal a word
/// displacement and should fade out, swap, and fade back in; immediate
/// changes restyle in place.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotChange {
    Immediate { slot: usize },
    Animated { slot: usize, previous_word: String },
    Cleared { slot: usize },
}

/// Style configuration for the projector, mirrored from the kiosk config.
#[derive(Debug, Clone, Copy)]
pub struct ProjectorStyle {
    pub min_font_size: f32,
    pub max_font_size: f32,
    pub color_low: (u8, u8, u8),
    pub color_high: (u8, u8, u8),
}

impl Default for ProjectorStyle {
    fn default() -> Self {
        Self {
            min_font_size: 20.0,
            max_font_size: 80.0,
            color_low: (120, 144, 156),
            color_high: (0, 121, 107),
        }
    }
}

/// Maps ranked (word, points) entries onto a fixed set of display slots and
/// detects per-slot identity changes to drive transition animation.
#[derive(Debug)]
pub struct Projector {
    slots: Vec<DisplaySlot>,
    style: ProjectorStyle,
}

impl Projector {
    pub fn new(slot_count: usize, style: ProjectorStyle) -> Self {
        Self {
            slots: vec![DisplaySlot::default(); slot_count],
            style,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[DisplaySlot] {
        &self.slots
    }

    /// Re-projects the ranked entries onto the slots, returning the set of
    /// changes the presentation layer needs to apply.
    pub fn refresh(&mut self, ranked: &[(String, i32)]) -> Vec<SlotChange> {
        let shown = &ranked[..ranked.len().min(self.slots.len())];
        let (min_points, max_points) = point_bounds(shown);

        let mut changes = Vec::new();

        for (i, slot) in self.slots.iter_mut().enumerate() {
            match shown.get(i) {
                Some((word, points)) => {
                    let word_changed = slot.word != *word;
                    let points_changed = slot.points != *points;
                    if !word_changed && !points_changed {
                        continue;
                    }

                    let change = if word_changed && !slot.word.is_empty() {
                        SlotChange::Animated {
                            slot: i,
                            previous_word: slot.word.clone(),
                        }
                    } else {
                        SlotChange::Immediate { slot: i }
                    };

                    slot.word = word.clone();
                    slot.points = *points;
                    slot.style = style_for(*points, min_points, max_points, &self.style);
                    changes.push(change);
                }
                None => {
                    if !slot.word.is_empty() {
                        *slot = DisplaySlot::default();
                        changes.push(SlotChange::Cleared { slot: i });
                    }
                }
            }
        }

        changes
    }

    /// Empties every slot without emitting changes, for session restarts.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = DisplaySlot::default();
        }
    }
}

fn point_bounds(shown: &[(String, i32)]) -> (i32, i32) {
    let min = shown.iter().map(|(_, p)| *p).min().unwrap_or(0);
    let max = shown.iter().map(|(_, p)| *p).max().unwrap_or(0);
    (min, max)
}

/// Min-max normalization across the displayed entries, floored at 0.2 so no
/// shown word shrinks to near-invisibility. Equal bounds pin to 0.5.
fn style_for(points: i32, min: i32, max: i32, style: &ProjectorStyle) -> SlotStyle {
    let norm = if max > min {
        (points - min) as f32 / (max - min) as f32
    } else {
        0.5
    };
    let norm = norm.max(0.2);

    SlotStyle {
        font_size: lerp(style.min_font_size, style.max_font_size, norm),
        color: (
            lerp(style.color_low.0 as f32, style.color_high.0 as f32, norm) as u8,
            lerp(style.color_low.1 as f32, style.color_high.1 as f32, norm) as u8,
            lerp(style.color_low.2 as f32, style.color_high.2 as f32, norm) as u8,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ranked(entries: &[(&str, i32)]) -> Vec<(String, i32)> {
        entries
            .iter()
            .map(|(w, p)| (w.to_string(), *p))
            .collect()
    }

    #[test]
    fn test_first_refresh_is_immediate() {
        let mut projector = Projector::new(3, ProjectorStyle::default());

        let changes = projector.refresh(&ranked(&[("A", 3), ("B", 1)]));

        assert_eq!(changes.len(), 2);
        assert_matches!(changes[0], SlotChange::Immediate { slot: 0 });
        assert_matches!(changes[1], SlotChange::Immediate { slot: 1 });
        assert_eq!(projector.slots()[0].word, "A");
        assert_eq!(projector.slots()[2].word, "");
    }

    #[test]
    fn test_word_displacement_is_animated() {
        let mut projector = Projector::new(2, ProjectorStyle::default());
        projector.refresh(&ranked(&[("A", 3), ("B", 1)]));

        // B overtakes A: both slots swap occupants
        let changes = projector.refresh(&ranked(&[("B", 5), ("A", 3)]));

        assert_eq!(changes.len(), 2);
        assert_matches!(
            &changes[0],
            SlotChange::Animated { slot: 0, previous_word } if previous_word == "A"
        );
        assert_matches!(
            &changes[1],
            SlotChange::Animated { slot: 1, previous_word } if previous_word == "B"
        );
    }

    #[test]
    fn test_points_only_change_is_immediate() {
        let mut projector = Projector::new(2, ProjectorStyle::default());
        projector.refresh(&ranked(&[("A", 1)]));

        let changes = projector.refresh(&ranked(&[("A", 2)]));

        assert_eq!(changes.len(), 1);
        assert_matches!(changes[0], SlotChange::Immediate { slot: 0 });
    }

    #[test]
    fn test_unchanged_slots_emit_nothing() {
        let mut projector = Projector::new(2, ProjectorStyle::default());
        projector.refresh(&ranked(&[("A", 1)]));

        assert!(projector.refresh(&ranked(&[("A", 1)])).is_empty());
    }

    #[test]
    fn test_slot_cleared_when_ranking_shrinks() {
        let mut projector = Projector::new(2, ProjectorStyle::default());
        projector.refresh(&ranked(&[("A", 2), ("B", 1)]));

        let changes = projector.refresh(&ranked(&[("A", 2)]));

        assert_eq!(changes.len(), 1);
        assert_matches!(changes[0], SlotChange::Cleared { slot: 1 });
        assert_eq!(projector.slots()[1], DisplaySlot::default());
    }

    #[test]
    fn test_normalization_spread() {
        let style = ProjectorStyle {
            min_font_size: 10.0,
            max_font_size: 20.0,
            color_low: (0, 0, 0),
            color_high: (100, 100, 100),
        };
        let mut projector = Projector::new(3, style);

        projector.refresh(&ranked(&[("A", 10), ("B", 5), ("C", 0)]));

        let slots = projector.slots();
        // top word at norm 1.0, bottom floored at 0.2
        assert_eq!(slots[0].style.font_size, 20.0);
        assert_eq!(slots[1].style.font_size, 15.0);
        assert_eq!(slots[2].style.font_size, 12.0);
        assert_eq!(slots[0].style.color, (100, 100, 100));
    }

    #[test]
    fn test_equal_points_normalize_to_half() {
        let style = ProjectorStyle {
            min_font_size: 10.0,
            max_font_size: 20.0,
            ..ProjectorStyle::default()
        };
        let mut projector = Projector::new(2, style);

        projector.refresh(&ranked(&[("A", 4), ("B", 4)]));

        assert_eq!(projector.slots()[0].style.font_size, 15.0);
        assert_eq!(projector.slots()[1].style.font_size, 15.0);
    }

    #[test]
    fn test_normalization_ignores_entries_beyond_slots() {
        let style = ProjectorStyle {
            min_font_size: 10.0,
            max_font_size: 20.0,
            ..ProjectorStyle::default()
        };
        let mut projector = Projector::new(2, style);

        // the 1-point entry has no slot and must not drag the min down
        projector.refresh(&ranked(&[("A", 10), ("B", 6), ("C", 1)]));

        assert_eq!(projector.slots()[0].style.font_size, 20.0);
        assert_eq!(projector.slots()[1].style.font_size, 12.0);
    }

    #[test]
    fn test_clear_resets_all_slots() {
        let mut projector = Projector::new(2, ProjectorStyle::default());
        projector.refresh(&ranked(&[("A", 1)]));

        projector.clear();

        assert!(projector.slots().iter().all(|s| s.word.is_empty()));
    }
}
