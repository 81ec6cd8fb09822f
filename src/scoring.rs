/// Derived outcome of a completed session, reported downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillVector {
    pub empathy: i32,
    pub active_listening: i32,
    pub self_awareness: i32,
}

/// Maps the cumulative empathic-choice count onto the three skill bands.
/// Total over `[0, 12]`; values outside are clamped to the nearest band.
pub fn compute_skill_vector(total_score: i32) -> SkillVector {
    let score = total_score.clamp(0, 12);

    if score >= 9 {
        SkillVector {
            empathy: 9,
            active_listening: 7,
            self_awareness: 5,
        }
    } else if score >= 6 {
        SkillVector {
            empathy: 8,
            active_listening: 6,
            self_awareness: 4,
        }
    } else {
        SkillVector {
            empathy: 7,
            active_listening: 5,
            self_awareness: 3,
        }
    }
}

/// Keywords reinforced in the word cloud when a session completes,
/// one trio per skill. The reinforcement delta is the skill's value.
pub const SKILL_KEYWORDS: [[&str; 3]; 3] = [
    ["Empatia", "Respeito ao cliente", "Compromisso"],
    ["Colaboração", "Parceria", "Resolução de problemas"],
    ["Adaptação", "Resiliência", "Estratégia"],
];

/// Expands a skill vector into the (word, delta) reinforcement pairs.
pub fn skill_keyword_points(skills: SkillVector) -> Vec<(&'static str, i32)> {
    let deltas = [
        skills.empathy,
        skills.active_listening,
        skills.self_awareness,
    ];

    SKILL_KEYWORDS
        .iter()
        .zip(deltas)
        .flat_map(|(words, delta)| words.iter().map(move |w| (*w, delta)))
        .collect()
}
