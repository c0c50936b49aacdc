//! Pure view models derived from session state.
//!
//! Everything a front end needs to draw is computed here: which blocks are
//! visible, how numbers are formatted, and which style each tag maps to.
//! Front ends only translate `Tone` / `MoodTone` into concrete colors.

use healthlens_contracts::{
    chat::{ChatTurn, Role, Sentiment},
    prediction::RiskLabel,
};

use crate::{chat::ChatSession, prediction::PredictionSession};

/// Label of the "assistant is composing" indicator.
pub const COMPOSING_LABEL: &str = "MannMitra is thinking...";

// ── Tag → style lookups ───────────────────────────────────────────────────────

/// Style class for a risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Danger,
    Warning,
    Success,
}

/// "High" is danger, "Moderate" is warning, everything else (including
/// "Low" and unrecognized labels) is success.
pub fn risk_tone(label: &RiskLabel) -> Tone {
    match label {
        RiskLabel::High => Tone::Danger,
        RiskLabel::Moderate => Tone::Warning,
        RiskLabel::Low | RiskLabel::Other(_) => Tone::Success,
    }
}

/// Style class for a sentiment badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodTone {
    Positive,
    Negative,
    Neutral,
}

/// Badge text and style for a sentiment. Unrecognized values look neutral.
pub fn mood(sentiment: &Sentiment) -> (&'static str, MoodTone) {
    match sentiment {
        Sentiment::Positive => ("😊 Positive", MoodTone::Positive),
        Sentiment::Negative => ("😔 Needs support", MoodTone::Negative),
        Sentiment::Neutral | Sentiment::Other(_) => ("😐 Neutral", MoodTone::Neutral),
    }
}

// ── Number formatting ─────────────────────────────────────────────────────────

/// Fixed-point text with ties rounded away from zero (`0.125` → `"0.13"`).
/// `{:.N}` alone would round ties to even.
fn to_fixed(value: f64, digits: u32) -> String {
    let scale = 10f64.powi(digits as i32);
    let rounded = (value * scale).round() / scale;
    format!("{:.*}", digits as usize, rounded)
}

pub fn format_risk_score(score: f64) -> String {
    to_fixed(score, 2)
}

pub fn format_shap(value: f64) -> String {
    to_fixed(value, 3)
}

/// `"(87% confident)"`; `None` for zero or NaN confidence, which is not shown.
pub fn format_confidence(confidence: f64) -> Option<String> {
    if confidence == 0.0 || confidence.is_nan() {
        return None;
    }
    Some(format!("({}% confident)", to_fixed(confidence * 100.0, 0)))
}

// ── Prediction ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationRow {
    pub feature: String,
    pub value: String,
    pub shap: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// Upper-cased disease name.
    pub disease: String,
    pub risk_score: String,
    pub risk_label: String,
    pub tone: Tone,
    /// Empty when the service sent no attributions; the block is then hidden.
    pub explanation: Vec<ExplanationRow>,
    pub advice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub error: Option<String>,
    pub result: Option<ResultView>,
}

pub fn prediction_view(session: &PredictionSession) -> PredictionView {
    let pending = session.is_pending();
    let result = session.result().map(|result| ResultView {
        disease: result.disease.to_uppercase(),
        risk_score: format_risk_score(result.risk_score),
        risk_label: result.risk_label.as_str().to_string(),
        tone: risk_tone(&result.risk_label),
        explanation: result
            .explanation
            .iter()
            .flatten()
            .map(|item| ExplanationRow {
                feature: item.feature.clone(),
                value: item.value.to_string(),
                shap: format_shap(item.shap_value),
            })
            .collect(),
        advice: result.advice.clone().filter(|advice| !advice.is_empty()),
    });

    PredictionView {
        submit_label: if pending { "Predicting..." } else { "Predict Risk" },
        submit_enabled: !pending,
        error: session.error().map(str::to_string),
        result,
    }
}

// ── Chat ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentBadge {
    pub label: &'static str,
    pub tone: MoodTone,
    pub confidence: Option<String>,
}

/// The badge for a turn, if it should show one: assistant turns carrying a
/// non-empty sentiment only.
pub fn sentiment_badge(turn: &ChatTurn) -> Option<SentimentBadge> {
    if turn.role != Role::Assistant {
        return None;
    }
    let sentiment = turn.sentiment.as_ref().filter(|s| !s.as_str().is_empty())?;
    let (label, tone) = mood(sentiment);
    Some(SentimentBadge {
        label,
        tone,
        confidence: turn.confidence.and_then(format_confidence),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnView {
    pub role: Role,
    pub content: String,
    /// Local wall-clock time the turn was appended, `HH:MM`.
    pub time: String,
    pub badge: Option<SentimentBadge>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    Turn(TurnView),
    /// Shown only while a reply is pending, always last.
    Composing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatView {
    pub entries: Vec<TranscriptEntry>,
    pub draft: String,
    pub send_enabled: bool,
}

pub fn chat_view(session: &ChatSession) -> ChatView {
    let mut entries: Vec<TranscriptEntry> = session
        .transcript()
        .turns()
        .iter()
        .map(|turn| {
            TranscriptEntry::Turn(TurnView {
                role: turn.role,
                content: turn.content.clone(),
                time: turn.sent_at.with_timezone(&chrono::Local).format("%H:%M").to_string(),
                badge: sentiment_badge(turn),
            })
        })
        .collect();

    if session.is_pending() {
        entries.push(TranscriptEntry::Composing);
    }

    ChatView {
        entries,
        draft: session.draft().to_string(),
        send_enabled: session.can_submit(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use healthlens_contracts::{
        chat::{ChatReply, ChatTurn, Role, Sentiment},
        prediction::{ExplanationItem, FeatureValue, PredictionResult, RiskLabel},
    };

    use super::*;
    use crate::{chat::ChatMsg, effect::Effect, prediction::PredictionMsg};

    fn assistant_turn(sentiment: Option<Sentiment>, confidence: Option<f64>) -> ChatTurn {
        ChatTurn {
            sequence: 1,
            role: Role::Assistant,
            content: "ok".to_string(),
            sentiment,
            confidence,
            sent_at: Utc::now(),
        }
    }

    fn settled_session(result: PredictionResult) -> PredictionSession {
        let mut session = PredictionSession::new();
        let id = match session.update(PredictionMsg::Submit) {
            Some(Effect::Predict { id, .. }) => id,
            other => panic!("expected Predict effect, got {:?}", other),
        };
        session.update(PredictionMsg::Settled { id, outcome: Ok(result) });
        session
    }

    fn result_with(label: &str) -> PredictionResult {
        PredictionResult {
            disease: "heart".to_string(),
            risk_score: 0.3456,
            risk_label: RiskLabel::from(label),
            explanation: None,
            advice: None,
        }
    }

    // ── Risk tone ────────────────────────────────────────────────────────────

    #[test]
    fn risk_tone_maps_every_label() {
        assert_eq!(risk_tone(&RiskLabel::High), Tone::Danger);
        assert_eq!(risk_tone(&RiskLabel::Moderate), Tone::Warning);
        assert_eq!(risk_tone(&RiskLabel::Low), Tone::Success);
        assert_eq!(risk_tone(&RiskLabel::from("Critical")), Tone::Success);
        assert_eq!(risk_tone(&RiskLabel::from("high")), Tone::Success);
    }

    // ── Prediction view ──────────────────────────────────────────────────────

    #[test]
    fn result_view_formats_score_and_hides_empty_blocks() {
        let mut result = result_with("Moderate");
        result.explanation = Some(vec![]);
        result.advice = Some(String::new());
        let view = prediction_view(&settled_session(result));

        let rendered = view.result.unwrap();
        assert_eq!(rendered.disease, "HEART");
        assert_eq!(rendered.risk_score, "0.35");
        assert_eq!(rendered.tone, Tone::Warning);
        assert!(rendered.explanation.is_empty());
        assert!(rendered.advice.is_none());
    }

    #[test]
    fn explanation_rows_show_raw_value_and_three_decimal_shap() {
        let mut result = result_with("Low");
        result.explanation = Some(vec![
            ExplanationItem {
                feature: "bmi".to_string(),
                value: FeatureValue::Number(26.5),
                shap_value: -0.04,
            },
            ExplanationItem {
                feature: "smoker".to_string(),
                value: FeatureValue::Text("yes".to_string()),
                shap_value: 0.1234,
            },
        ]);
        let rows = prediction_view(&settled_session(result)).result.unwrap().explanation;

        assert_eq!(
            rows,
            vec![
                ExplanationRow {
                    feature: "bmi".to_string(),
                    value: "26.5".to_string(),
                    shap: "-0.040".to_string(),
                },
                ExplanationRow {
                    feature: "smoker".to_string(),
                    value: "yes".to_string(),
                    shap: "0.123".to_string(),
                },
            ]
        );
    }

    #[test]
    fn pending_view_disables_submit_and_shows_no_result() {
        let mut session = PredictionSession::new();
        session.update(PredictionMsg::Submit);

        let view = prediction_view(&session);
        assert_eq!(view.submit_label, "Predicting...");
        assert!(!view.submit_enabled);
        assert!(view.result.is_none());
        assert!(view.error.is_none());
    }

    #[test]
    fn halfway_values_round_up() {
        assert_eq!(format_risk_score(0.125), "0.13");
        assert_eq!(format_shap(0.0625), "0.063");
        assert_eq!(format_shap(-0.0625), "-0.063");
        assert_eq!(format_confidence(0.125).as_deref(), Some("(13% confident)"));
        assert_eq!(format_confidence(0.625).as_deref(), Some("(63% confident)"));
    }

    // ── Sentiment badge ──────────────────────────────────────────────────────

    #[test]
    fn badge_labels_cover_known_and_unknown_sentiments() {
        let cases = [
            (Sentiment::Positive, "😊 Positive", MoodTone::Positive),
            (Sentiment::Negative, "😔 Needs support", MoodTone::Negative),
            (Sentiment::Neutral, "😐 Neutral", MoodTone::Neutral),
            (Sentiment::from("anxious"), "😐 Neutral", MoodTone::Neutral),
        ];
        for (sentiment, label, tone) in cases {
            let badge = sentiment_badge(&assistant_turn(Some(sentiment), None)).unwrap();
            assert_eq!(badge.label, label);
            assert_eq!(badge.tone, tone);
        }
    }

    #[test]
    fn badge_only_on_assistant_turns_with_sentiment() {
        assert!(sentiment_badge(&assistant_turn(None, Some(0.9))).is_none());
        assert!(sentiment_badge(&assistant_turn(Some(Sentiment::from("")), None)).is_none());

        let mut user = assistant_turn(Some(Sentiment::Positive), None);
        user.role = Role::User;
        assert!(sentiment_badge(&user).is_none());
    }

    #[test]
    fn confidence_renders_as_rounded_percentage() {
        assert_eq!(format_confidence(0.873).as_deref(), Some("(87% confident)"));
        assert_eq!(format_confidence(1.0).as_deref(), Some("(100% confident)"));
        assert_eq!(format_confidence(0.0), None);
        assert_eq!(format_confidence(f64::NAN), None);

        let badge = sentiment_badge(&assistant_turn(Some(Sentiment::Negative), Some(0.66))).unwrap();
        assert_eq!(badge.confidence.as_deref(), Some("(66% confident)"));
    }

    // ── Chat view ────────────────────────────────────────────────────────────

    #[test]
    fn composing_indicator_is_last_only_while_pending() {
        let mut session = ChatSession::new();
        session.update(ChatMsg::UpdateDraft("hello".to_string()));
        let id = match session.update(ChatMsg::Submit) {
            Some(Effect::Chat { id, .. }) => id,
            other => panic!("expected Chat effect, got {:?}", other),
        };

        let pending = chat_view(&session);
        assert_eq!(pending.entries.len(), 3);
        assert_eq!(pending.entries.last(), Some(&TranscriptEntry::Composing));
        assert!(!pending.send_enabled);

        session.update(ChatMsg::Settled {
            id,
            outcome: Ok(ChatReply {
                response: Some("hi".to_string()),
                ..ChatReply::default()
            }),
        });

        let settled = chat_view(&session);
        assert_eq!(settled.entries.len(), 3);
        assert!(!settled.entries.contains(&TranscriptEntry::Composing));
    }
}
