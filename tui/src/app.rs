//! TUI application state and key handling.
//!
//! `App` owns one prediction session and one chat session. Keys are turned
//! into session messages here; any effect a session returns is handed back
//! to the event loop, which runs it in the background and feeds the
//! settlement into [`App::apply`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use healthlens_contracts::prediction::Disease;
use healthlens_core::{
    chat::{ChatMsg, ChatSession},
    driver::{self, Settlement},
    effect::Effect,
    prediction::{FormField, PredictionMsg, PredictionSession},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Predict,
    Chat,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Predict => "Disease Risk Prediction",
            Tab::Chat => "Mental Health Support",
        }
    }
}

pub struct App {
    pub tab: Tab,
    pub prediction: PredictionSession,
    pub chat: ChatSession,
    /// Index into `FormField::ALL` of the focused form input.
    pub focus: usize,
    /// Animation counter for the composing spinner.
    pub tick: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            tab: Tab::Predict,
            prediction: PredictionSession::new(),
            chat: ChatSession::new(),
            focus: 0,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn focused_field(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Route a finished request back to its session.
    pub fn apply(&mut self, settlement: Settlement) {
        driver::apply(settlement, &mut self.prediction, &mut self.chat);
    }

    /// Handle one key press. Returns the network call to start, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return None;
            }
            KeyCode::F(1) => {
                self.tab = Tab::Predict;
                return None;
            }
            KeyCode::F(2) => {
                self.tab = Tab::Chat;
                return None;
            }
            _ => {}
        }

        match self.tab {
            Tab::Predict => self.handle_predict_key(key.code, ctrl),
            Tab::Chat => self.handle_chat_key(key.code, ctrl),
        }
    }

    fn handle_predict_key(&mut self, code: KeyCode, ctrl: bool) -> Option<Effect> {
        let field = self.focused_field();
        match code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FormField::ALL.len();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
                None
            }
            KeyCode::Enter => self.prediction.update(PredictionMsg::Submit),
            KeyCode::Char('r') if ctrl => self.prediction.update(PredictionMsg::Reset),
            KeyCode::Left | KeyCode::Right if field == FormField::Disease => {
                let step = if code == KeyCode::Right { 1 } else { Disease::KNOWN.len() - 1 };
                let next = cycle_disease(&self.prediction.form().disease, step);
                self.prediction.update(PredictionMsg::UpdateField {
                    field,
                    value: next.as_str().to_string(),
                })
            }
            KeyCode::Char(c) if !ctrl && field != FormField::Disease => {
                let mut value = self.prediction.form().get(field).to_string();
                value.push(c);
                self.prediction.update(PredictionMsg::UpdateField { field, value })
            }
            KeyCode::Backspace if field != FormField::Disease => {
                let mut value = self.prediction.form().get(field).to_string();
                value.pop();
                self.prediction.update(PredictionMsg::UpdateField { field, value })
            }
            _ => None,
        }
    }

    fn handle_chat_key(&mut self, code: KeyCode, ctrl: bool) -> Option<Effect> {
        match code {
            KeyCode::Enter => self.chat.update(ChatMsg::Submit),
            KeyCode::Char(c) if !ctrl => {
                let mut draft = self.chat.draft().to_string();
                draft.push(c);
                self.chat.update(ChatMsg::UpdateDraft(draft))
            }
            KeyCode::Backspace => {
                let mut draft = self.chat.draft().to_string();
                draft.pop();
                self.chat.update(ChatMsg::UpdateDraft(draft))
            }
            _ => None,
        }
    }
}

/// The known disease `step` positions after `current`. An unrecognized
/// value cycles from the first option.
fn cycle_disease(current: &str, step: usize) -> Disease {
    let known = &Disease::KNOWN;
    let position = known.iter().position(|d| d.as_str() == current);
    match position {
        Some(i) => known[(i + step) % known.len()].clone(),
        None => known[0].clone(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use healthlens_core::effect::Effect;

    use super::*;

    fn press(app: &mut App, code: KeyCode) -> Option<Effect> {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_fills_focused_numeric_field() {
        let mut app = App::new();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_field(), FormField::Age);

        type_text(&mut app, "455");
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.prediction.form().age, "45");
    }

    #[test]
    fn arrows_cycle_disease_options() {
        let mut app = App::new();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.prediction.form().disease, "heart");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.prediction.form().disease, "diabetes");
        press(&mut app, KeyCode::Left);
        assert_eq!(app.prediction.form().disease, "hypertension");
    }

    #[test]
    fn enter_submits_once_until_settled() {
        let mut app = App::new();
        assert!(matches!(press(&mut app, KeyCode::Enter), Some(Effect::Predict { .. })));
        assert!(press(&mut app, KeyCode::Enter).is_none());
    }

    #[test]
    fn ctrl_r_resets_form() {
        let mut app = App::new();
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "60");

        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));

        assert_eq!(app.prediction.form().age, "");
    }

    #[test]
    fn chat_tab_edits_draft_and_submits() {
        let mut app = App::new();
        press(&mut app, KeyCode::F(2));
        type_text(&mut app, "hi there");

        match press(&mut app, KeyCode::Enter) {
            Some(Effect::Chat { request, .. }) => assert_eq!(request.message, "hi there"),
            other => panic!("expected Chat effect, got {:?}", other),
        }
        assert_eq!(app.chat.draft(), "");
        assert_eq!(app.chat.transcript().len(), 2);
    }

    #[test]
    fn escape_quits() {
        let mut app = App::new();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
