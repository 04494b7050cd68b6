use crate::cards::{Card, Rank, Suit};
use crate::engine::{HandView, SeatView, Snapshot};
use crate::game::{HistoryEntry, Phase, Winner, SEATS};
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let snap = Snapshot::of(&app.game);
    let size = f.area();
    let status_height: u16 = 3 + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),             // header
            Constraint::Length(5),             // dealer
            Constraint::Min(6),                // seats
            Constraint::Length(status_height), // status bar
        ])
        .split(size);

    let rules = app.game.rules();
    let header_lines = vec![
        Line::from(format!(
            "Round {}   Decks: {}   Dealer: {}   Pairs: {}",
            snap.round, app.config.decks, rules.dealer_rule, rules.pair_rule
        )),
        Line::from(match (snap.phase, snap.idle_secs) {
            (Phase::Players, Some(secs)) => format!("Idle timeout: {secs}s"),
            (Phase::Players, None) => String::new(),
            (Phase::Dealer, _) => "Dealer is drawing".to_string(),
            (Phase::Over, _) => "Round over".to_string(),
            (Phase::Waiting, _) => "Waiting to deal".to_string(),
            (Phase::Aborted, _) => "Round aborted".to_string(),
        }),
    ];
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("blackjack-rs").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    draw_dealer(f, chunks[1], &snap);
    draw_seats(f, chunks[2], app, &snap);
    draw_status(f, chunks[3], app, &snap);
}

fn draw_dealer(f: &mut Frame, area: Rect, snap: &Snapshot) {
    let value = if snap.dealer.cards.is_empty() { "--".to_string() } else { snap.dealer.value.to_string() };
    let block = Block::default().title(format!("Dealer: {value}")).borders(Borders::ALL);
    let dealer_inner = inner(area);
    f.render_widget(block, area);
    let slots = snap.dealer.cards.len().max(2) as u16;
    let card_width = (dealer_inner.width / slots).min(8);
    let card_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..slots).map(|_| Constraint::Length(card_width)).collect::<Vec<_>>())
        .split(dealer_inner);
    for (i, slot) in card_chunks.iter().enumerate() {
        let card = snap.dealer.cards.get(i).copied();
        let hidden = i == 0 && snap.dealer.hide_first;
        render_card_widget(f, *slot, card, hidden);
    }
}

fn draw_seats(f: &mut Frame, area: Rect, app: &AppState, snap: &Snapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..SEATS).map(|_| Constraint::Ratio(1, SEATS as u32)).collect::<Vec<_>>())
        .split(area);
    for (idx, seat) in snap.seats.iter().enumerate() {
        if let Some(seat_area) = cols.get(idx) {
            render_seat(f, *seat_area, app, snap, idx, seat);
        }
    }
}

fn render_seat(f: &mut Frame, seat_area: Rect, app: &AppState, snap: &Snapshot, idx: usize, seat: &SeatView) {
    let mut title = format!("P{} {}", idx + 1, app.seat_label(idx));
    let acting = snap.current_seat == Some(idx);
    if acting {
        title.push_str(" [Act]");
    }
    let won = snap.game_over() && snap.winners.contains(Winner::Seat(idx));
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if won {
        block = block.border_style(Style::default().fg(Color::Green));
    } else if acting {
        block = block.border_style(Style::default().fg(Color::Yellow));
    } else if seat.done {
        block = block.border_style(Style::default().fg(Color::DarkGray));
    }

    let mut lines: Vec<Line> = Vec::new();
    for (hi, hand) in seat.hands.iter().enumerate() {
        if seat.hands.len() > 1 {
            lines.push(Line::from(Span::styled(
                format!("Hand {}", hi + 1),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        lines.push(hand_cards_line(hand));
        lines.push(hand_status_line(hand));
    }
    f.render_widget(block, seat_area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(seat_area));
}

fn hand_cards_line(hand: &HandView) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::with_capacity(hand.cards.len() * 2);
    for card in &hand.cards {
        spans.push(card_span(*card));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn hand_status_line(hand: &HandView) -> Line<'static> {
    let status = match hand.finish {
        Some(finish) => finish.label().to_string(),
        None if hand.active => "Playing".to_string(),
        None => String::new(),
    };
    let style = if hand.value > 21 {
        Style::default().fg(Color::LightRed)
    } else if hand.active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("= {}  {status}", hand.value), style))
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState, snap: &Snapshot) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner(area));

    let mut left: Vec<Line> = Vec::new();
    match snap.phase {
        Phase::Waiting => left.push(Line::from("No round dealt. Press N to deal.")),
        Phase::Aborted => left.push(Line::from("Round aborted. Press N for a new shoe.")),
        Phase::Over => {
            let style = if snap.winners.is_empty() {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            };
            left.push(Line::from(Span::styled(snap.winners.summary(), style)));
            left.push(Line::from("Press N for the next round."));
        }
        Phase::Players | Phase::Dealer => {
            if let (Some(seat), Some(hand)) = (snap.current_seat, snap.current_hand) {
                left.push(Line::from(format!("Acting: P{} hand {}", seat + 1, hand + 1)));
            }
            if let Some(hint) = app.hint_label() {
                left.push(Line::from(Span::styled(
                    format!("Table says: {hint}"),
                    Style::default().fg(Color::Cyan),
                )));
            }
        }
    }
    if let Some(err) = app.action_error() {
        left.push(Line::from(Span::styled(format!("Error: {err}"), Style::default().fg(Color::Red))));
    }

    let right = vec![
        Line::from("H hit • S stand • D double • P split"),
        Line::from("N deal • ? help • Y history • L log • M menu"),
    ];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );
}

fn history_line(entry: &HistoryEntry) -> String {
    let who = match entry.seat {
        Some(seat) => format!("P{} hand {}", seat + 1, entry.hand + 1),
        None => "Dealer".to_string(),
    };
    let card = entry.card.map(|c| format!(" {c}")).unwrap_or_default();
    format!("{who}: {}{card}", entry.verb.label())
}

pub(super) fn draw_history(f: &mut Frame, app: &AppState) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("History").borders(Borders::ALL);
    let mut lines: Vec<Line> = Vec::new();
    let entries = app.game.history_recent_offset(AppState::HISTORY_PAGE_SIZE, app.history_offset());
    if entries.is_empty() {
        lines.push(Line::from("No history yet."));
    } else {
        lines.extend(entries.iter().map(|e| Line::from(history_line(e))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down scroll • Close: Y or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

pub(super) fn draw_log(f: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 80, f.area());
    let block = Block::default().title("Log").borders(Borders::ALL);
    let rows = inner(area).height.saturating_sub(1) as usize;
    let mut lines: Vec<Line> = app.logs().recent(rows).into_iter().map(Line::from).collect();
    if lines.is_empty() {
        lines.push(Line::from("Nothing logged."));
    }
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner(area));
}

pub(super) fn draw_fatal(f: &mut Frame, err: &str) {
    let area = centered_rect(60, 30, f.area());
    let block = Block::default()
        .title("Error")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let lines = vec![
        Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Play has stopped. N to retry with a new shoe, M for the menu, Q to quit."),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).alignment(Alignment::Center),
        inner(area),
    );
}

pub(super) fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table:", bold)),
        Line::from("- H: hit"),
        Line::from("- S: stand"),
        Line::from("- D: double (two cards only)"),
        Line::from("- P: split a pair"),
        Line::from("- N / Space: deal the next round"),
        Line::from("- Y: history"),
        Line::from("- L: log"),
        Line::from(""),
        Line::from("A hand left alone past the idle timeout stands by itself."),
        Line::from(""),
        Line::from(Span::styled("Menu:", bold)),
        Line::from("- M: open / close menu"),
        Line::from("- Up / Down: move selection"),
        Line::from("- + / -: adjust value"),
        Line::from("- Enter: apply and deal"),
        Line::from("- Esc: cancel"),
        Line::from("- Q: quit"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

fn suit_glyph_and_style(s: Suit) -> (char, Style) {
    match s {
        Suit::Hearts => ('♥', Style::default().fg(Color::Red)),
        Suit::Diamonds => ('♦', Style::default().fg(Color::Red)),
        Suit::Spades => ('♠', Style::default().fg(Color::White)),
        Suit::Clubs => ('♣', Style::default().fg(Color::White)),
    }
}

fn rank_text(r: Rank) -> &'static str {
    match r {
        Rank::Ten => "10",
        Rank::Jack => "J",
        Rank::Queen => "Q",
        Rank::King => "K",
        Rank::Ace => "A",
        other => other.label(),
    }
}

fn card_span(c: Card) -> Span<'static> {
    let (glyph, style) = suit_glyph_and_style(c.suit());
    Span::styled(format!("{}{}", rank_text(c.rank()), glyph), style)
}

fn render_card_widget(f: &mut Frame, area: Rect, card: Option<Card>, hidden: bool) {
    let block = Block::default().borders(Borders::ALL);
    let card_inner = inner(area);
    f.render_widget(block, area);
    let content = match card {
        Some(_) if hidden => Line::from(Span::styled("##", Style::default().fg(Color::Blue))),
        Some(c) => Line::from(card_span(c)),
        None => Line::from("  "),
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), card_inner);
}
