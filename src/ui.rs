use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState, ScreenModel};
use empatia::projector::DisplaySlot;

const HORIZONTAL_MARGIN: u16 = 5;
const CLOUD_COLUMNS: usize = 3;

const FINAL_MESSAGE: &str = "Candidato, empatia não resolve todos os problemas, mas muda a forma \
                             como você os enfrenta. Cada decisão contribuiu para fortalecer suas \
                             habilidades de Empatia, Escuta Ativa e Autoconsciência, pontuadas ao \
                             longo desta experiência.";

pub fn render(app: &App, f: &mut Frame) {
    match app.state {
        AppState::Game => render_game(app, f),
        AppState::Results => render_results(app, f),
    }
}

fn render_game(app: &App, f: &mut Frame) {
    let model = app.screen.lock().unwrap().clone();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(f.area());

    let caption = Paragraph::new(Span::styled(
        model.caption.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(caption, chunks[0]);

    render_images(&model, f, chunks[1]);

    if model.summary_alpha > 0.0 {
        render_cloud(app, f, chunks[2]);
    } else {
        render_choices(app, &model, f, chunks[2]);
    }

    let footer = Paragraph::new(Span::styled(
        format!(
            "[1-9] alternar   [Enter] {}   [←] reiniciar   [Esc] sair",
            model.confirm_label
        ),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);
}

fn render_images(model: &ScreenModel, f: &mut Frame, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let panes = [
        ("cena", &model.primary_image, model.primary_alpha),
        ("reação", &model.secondary_image, model.secondary_alpha),
    ];

    for (i, (title, asset, alpha)) in panes.iter().enumerate() {
        if *alpha <= 0.0 {
            continue;
        }
        if let Some(asset) = asset {
            let pane = Paragraph::new(Span::styled(
                asset.clone(),
                Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            ))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(*title));
            f.render_widget(pane, halves[i]);
        }
    }
}

fn render_choices(app: &App, model: &ScreenModel, f: &mut Frame, area: Rect) {
    let round = match app.engine.round() {
        Some(round) => round,
        None => return,
    };
    let selections = app.engine.selections();

    let selected_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD | Modifier::REVERSED);

    let mut lines = Vec::new();
    for (i, choice) in round.choices.iter().enumerate() {
        if !model.choice_visible.get(i).copied().unwrap_or(false) {
            continue;
        }
        let selected = selections.get(i).copied().unwrap_or(false);
        let marker = if selected { "◼" } else { "◻" };
        lines.push(Line::from(Span::styled(
            format!("{} {}. {}", marker, i + 1, choice.text),
            if selected {
                selected_style
            } else {
                Style::default()
            },
        )));
    }

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Word cloud rows: one padded span per occupied slot, colored by the slot
/// style and weight-bucketed into bold/plain/dim since a terminal cannot
/// scale glyphs.
fn render_cloud(app: &App, f: &mut Frame, area: Rect) {
    let slots: Vec<&DisplaySlot> = app
        .engine
        .projector()
        .slots()
        .iter()
        .filter(|s| !s.word.is_empty())
        .collect();

    let col_width = slots.iter().map(|s| s.word.width()).max().unwrap_or(0) + 4;

    let mut lines = Vec::new();
    for row in slots.chunks(CLOUD_COLUMNS) {
        let mut spans = Vec::new();
        for slot in row {
            let pad = col_width.saturating_sub(slot.word.width());
            let left = pad / 2;
            spans.push(Span::styled(
                format!(
                    "{}{}{}",
                    " ".repeat(left),
                    slot.word,
                    " ".repeat(pad - left)
                ),
                cloud_style(app, slot),
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        app.config.summary_feedback.clone(),
        Style::default().add_modifier(Modifier::ITALIC),
    )));

    let cloud = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(cloud, area);
}

fn cloud_style(app: &App, slot: &DisplaySlot) -> Style {
    let (r, g, b) = slot.style.color;
    let style = Style::default().fg(Color::Rgb(r, g, b));

    let span = app.config.max_font_size - app.config.min_font_size;
    let mid = app.config.min_font_size + span * 0.5;
    let low = app.config.min_font_size + span * 0.25;

    if slot.style.font_size >= mid {
        style.add_modifier(Modifier::BOLD)
    } else if slot.style.font_size <= low {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

fn render_results(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Min(7),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(f.area());

    let mut score_lines = vec![Line::from(Span::styled(
        "Resultado",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(skills) = app.final_skills {
        score_lines.push(Line::from(format!("Empatia: {} pontos", skills.empathy)));
        score_lines.push(Line::from(format!(
            "Escuta Ativa: {} pontos",
            skills.active_listening
        )));
        score_lines.push(Line::from(format!(
            "Autoconsciência: {} pontos",
            skills.self_awareness
        )));
        score_lines.push(Line::from(Span::styled(
            format!("Pontuação Total: {}/12", app.engine.cumulative_score()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }
    f.render_widget(
        Paragraph::new(score_lines).alignment(Alignment::Center),
        chunks[0],
    );

    let message = Paragraph::new(Span::styled(
        FINAL_MESSAGE,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[1]);

    let mut word_lines = vec![Line::from(Span::styled(
        "Palavras mais escolhidas:",
        Style::default().add_modifier(Modifier::UNDERLINED),
    ))];
    for (i, (word, points)) in app.top_words.iter().enumerate() {
        word_lines.push(Line::from(format!(
            "{}. {}: {} pontos",
            i + 1,
            word,
            points
        )));
    }
    f.render_widget(
        Paragraph::new(word_lines).alignment(Alignment::Center),
        chunks[2],
    );

    let card = Paragraph::new(Span::styled(
        format!("Aproxime seu cartão — ou digite o id: {}_", app.card_entry),
        Style::default().fg(Color::Yellow),
    ))
    .alignment(Alignment::Center);
    f.render_widget(card, chunks[3]);

    let footer = Paragraph::new(Span::styled(
        "[Enter] enviar cartão   [←] novo jogo   [Esc] sair",
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[4]);
}
