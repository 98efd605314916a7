use chrono::{Local, NaiveDate};

use crate::models::{Appointment, Field, Role, ServiceCatalog, Turn};
use crate::services::extraction::{self, ExtractionContext};

pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DialogueError {
    #[error("conversation history is empty")]
    EmptyHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    Greeting,
    Collecting,
    Confirmation,
}

impl DialogueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueState::Greeting => "greeting",
            DialogueState::Collecting => "collecting",
            DialogueState::Confirmation => "confirmation",
        }
    }

    fn for_record(appointment: &Appointment) -> Self {
        if appointment.is_complete() {
            DialogueState::Confirmation
        } else if appointment.missing().len() == Field::ALL.len() {
            DialogueState::Greeting
        } else {
            DialogueState::Collecting
        }
    }
}

/// Result of one turn: the updated record and what to say back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub appointment: Appointment,
    pub reply: String,
    pub state: DialogueState,
    pub missing: Vec<Field>,
}

/// Stateless turn planner. Holds only read-only configuration, so one instance
/// can serve any number of sessions.
#[derive(Debug, Clone)]
pub struct Planner {
    catalog: ServiceCatalog,
    date_format: String,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(ServiceCatalog::default(), DEFAULT_DATE_FORMAT)
    }
}

impl Planner {
    pub fn new(catalog: ServiceCatalog, date_format: impl Into<String>) -> Self {
        Self {
            catalog,
            date_format: date_format.into(),
        }
    }

    /// Processes the latest turn against the local calendar date.
    pub fn advance(&self, history: &[Turn], current: Appointment) -> Result<Advance, DialogueError> {
        self.advance_on(history, current, Local::now().date_naive())
    }

    pub fn advance_on(
        &self,
        history: &[Turn],
        current: Appointment,
        today: NaiveDate,
    ) -> Result<Advance, DialogueError> {
        let last = history.last().ok_or(DialogueError::EmptyHistory)?;
        if last.role != Role::User {
            tracing::warn!(role = last.role.as_str(), "last turn is not from the user");
        }

        let ctx = ExtractionContext {
            catalog: &self.catalog,
            today,
            date_format: &self.date_format,
        };

        let mut appointment = current.clone();
        extraction::apply(&mut appointment, &last.content, &ctx);

        let missing = appointment.missing();
        let state = DialogueState::for_record(&appointment);

        let reply = match state {
            DialogueState::Confirmation => confirmation(&appointment),
            DialogueState::Greeting => self.greeting(),
            DialogueState::Collecting => {
                let mut reply = String::new();
                if !appointment.newly_filled(&current).is_empty() {
                    reply.push_str("Thank you! ");
                }
                reply.push_str(&self.next_question(&missing));
                reply
            }
        };

        tracing::info!(
            state = state.as_str(),
            missing = missing.len(),
            "advanced booking dialogue"
        );

        Ok(Advance {
            appointment,
            reply,
            state,
            missing,
        })
    }

    /// First assistant line of a fresh conversation.
    pub fn opening_message(&self) -> String {
        "Hello! I'm your appointment assistant. I can help you schedule an appointment \
         with our team. What service are you interested in booking?"
            .to_string()
    }

    fn greeting(&self) -> String {
        format!(
            "Great! I'd be happy to help you schedule an appointment. We offer the following services:\n\n{}\n\nWhich service are you interested in?",
            self.catalog.numbered_list()
        )
    }

    fn next_question(&self, missing: &[Field]) -> String {
        const PRIORITY: [Field; 5] = [Field::Name, Field::Email, Field::Phone, Field::Date, Field::Time];

        let next = PRIORITY.into_iter().find(|f| missing.contains(f));
        match next {
            Some(Field::Name) => "Could you please provide your full name?".to_string(),
            Some(Field::Email) => "What's your email address?".to_string(),
            Some(Field::Phone) => "What's the best phone number to reach you?".to_string(),
            Some(Field::Date) => "What date works best for you?".to_string(),
            Some(Field::Time) => match self.catalog.availability_window() {
                Some(window) => format!("What time would you prefer? We have availability {window}."),
                None => "What time would you prefer?".to_string(),
            },
            // Only the service is left.
            Some(Field::Service) | None => format!(
                "Which service would you like to book?\n\n{}",
                self.catalog.numbered_list()
            ),
        }
    }
}

/// Processes the latest turn with the default catalog and the local date.
pub fn advance(history: &[Turn], current: Appointment) -> Result<Advance, DialogueError> {
    Planner::default().advance(history, current)
}

fn confirmation(appt: &Appointment) -> String {
    let value = |field: Field| appt.get(field).unwrap_or_default();
    format!(
        "Perfect! I have all the information I need. Let me confirm your appointment:\n\n\
         📅 Service: {}\n\
         👤 Name: {}\n\
         📧 Email: {}\n\
         📱 Phone: {}\n\
         📆 Date: {}\n\
         🕐 Time: {}\n\n\
         Your appointment has been scheduled! You'll receive a confirmation email shortly. \
         Is there anything else I can help you with?",
        value(Field::Service),
        value(Field::Name),
        value(Field::Email),
        value(Field::Phone),
        value(Field::Date),
        value(Field::Time),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn run(history: &[Turn], current: Appointment) -> Advance {
        Planner::default().advance_on(history, current, today()).unwrap()
    }

    fn full() -> Appointment {
        Appointment {
            service: Some("Consultation".to_string()),
            name: Some("John Smith".to_string()),
            email: Some("john@x.com".to_string()),
            phone: Some("555-123-4567".to_string()),
            date: Some("10/24/2026".to_string()),
            time: Some("3:00 pm".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_empty_history_fails() {
        let result = Planner::default().advance_on(&[], Appointment::default(), today());
        assert_eq!(result.unwrap_err(), DialogueError::EmptyHistory);
    }

    #[test]
    fn test_service_then_name_prompt() {
        let out = run(&[Turn::user("I'd like a Consultation")], Appointment::default());
        assert_eq!(out.appointment.service.as_deref(), Some("Consultation"));
        assert_eq!(out.state, DialogueState::Collecting);
        assert_eq!(out.reply, "Thank you! Could you please provide your full name?");
    }

    #[test]
    fn test_name_and_email_then_phone_prompt() {
        let history = [
            Turn::user("I'd like a Consultation"),
            Turn::assistant("Thank you! Could you please provide your full name?"),
            Turn::user("my name is john smith, email john@x.com"),
        ];
        let current = Appointment {
            service: Some("Consultation".to_string()),
            ..Default::default()
        };
        let out = run(&history, current);
        assert_eq!(out.appointment.name.as_deref(), Some("John Smith"));
        assert_eq!(out.appointment.email.as_deref(), Some("john@x.com"));
        assert!(out.reply.starts_with("Thank you!"));
        assert!(out.reply.ends_with("What's the best phone number to reach you?"));
    }

    #[test]
    fn test_last_field_confirms() {
        let mut current = full();
        current.time = None;
        let out = run(&[Turn::user("3:00 pm works")], current);

        assert_eq!(out.appointment.time.as_deref(), Some("3:00 pm"));
        assert_eq!(out.state, DialogueState::Confirmation);
        assert!(out.missing.is_empty());
        assert!(out.reply.contains("Your appointment has been scheduled!"));
        for field in Field::ALL {
            assert!(out.reply.contains(out.appointment.get(field).unwrap()));
        }
    }

    #[test]
    fn test_confirmation_is_idempotent() {
        let first = run(&[Turn::user("thanks!")], full());
        let second = run(&[Turn::user("my name is bob, 9am tomorrow")], full());
        assert_eq!(first.appointment, full());
        assert_eq!(second.appointment, full());
        assert_eq!(first.reply, second.reply);
    }

    #[test]
    fn test_tomorrow_fills_only_date() {
        let out = run(&[Turn::user("see you tomorrow")], Appointment::default());
        assert_eq!(
            out.appointment,
            Appointment {
                date: Some("10/19/2026".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(out.reply, "Thank you! Could you please provide your full name?");
    }

    #[test]
    fn test_greeting_lists_catalog() {
        let out = run(&[Turn::user("hello there")], Appointment::default());
        assert_eq!(out.state, DialogueState::Greeting);
        assert_eq!(
            out.reply,
            "Great! I'd be happy to help you schedule an appointment. We offer the following services:\n\n\
             1. Consultation\n2. Follow-up Meeting\n3. Technical Support\n4. Sales Demo\n\
             5. Training Session\n6. Strategy Meeting\n\nWhich service are you interested in?"
        );
    }

    #[test]
    fn test_no_thanks_without_new_field() {
        let current = Appointment {
            service: Some("Sales Demo".to_string()),
            ..Default::default()
        };
        let out = run(&[Turn::user("hmm let me think")], current.clone());
        assert_eq!(out.appointment, current);
        assert_eq!(out.reply, "Could you please provide your full name?");
    }

    #[test]
    fn test_existing_fields_are_never_overwritten() {
        let current = Appointment {
            name: Some("Alice Jones".to_string()),
            email: Some("alice@x.com".to_string()),
            ..Default::default()
        };
        let out = run(&[Turn::user("my name is bob, bob@y.com")], current.clone());
        assert_eq!(out.appointment.name, current.name);
        assert_eq!(out.appointment.email, current.email);
        assert!(!out.reply.starts_with("Thank you!"));
    }

    #[test]
    fn test_walkthrough_is_monotonic() {
        let utterances = [
            "hello",
            "technical support please",
            "I am ana lopez",
            "i'm bob actually, ana@x.com",
            "555.867.5309",
            "tomorrow at 10am",
            "make that consultation on 11/1/2026 at 4pm",
        ];
        let planner = Planner::default();
        let mut history = Vec::new();
        let mut record = Appointment::default();

        for text in utterances {
            history.push(Turn::user(text));
            let out = planner.advance_on(&history, record.clone(), today()).unwrap();
            for field in Field::ALL {
                if let Some(before) = record.get(field) {
                    assert_eq!(out.appointment.get(field), Some(before));
                }
            }
            assert_eq!(out.missing, out.appointment.missing());
            history.push(Turn::assistant(out.reply.clone()));
            record = out.appointment;
        }

        assert_eq!(
            record,
            Appointment {
                service: Some("Technical Support".to_string()),
                name: Some("Ana Lopez".to_string()),
                email: Some("ana@x.com".to_string()),
                phone: Some("555.867.5309".to_string()),
                date: Some("10/19/2026".to_string()),
                time: Some("10am".to_string()),
                notes: None,
            }
        );
    }

    #[test]
    fn test_time_prompt_quotes_slots() {
        let mut current = full();
        current.time = None;
        let out = run(&[Turn::user("not sure yet")], current);
        assert_eq!(
            out.reply,
            "What time would you prefer? We have availability from 9:00 AM to 5:00 PM."
        );
    }

    #[test]
    fn test_service_prompted_when_only_service_missing() {
        // Service is never asked for while other fields are missing, but once it is
        // the only gap the planner asks for it instead of replying with nothing.
        let mut current = full();
        current.service = None;
        let out = run(&[Turn::user("ok")], current);
        assert_eq!(out.missing, vec![Field::Service]);
        assert!(out.reply.starts_with("Which service would you like to book?"));
        assert!(out.reply.contains("6. Strategy Meeting"));
    }

    #[test]
    fn test_service_not_prompted_while_others_missing() {
        let current = Appointment {
            name: Some("Ann Lee".to_string()),
            ..Default::default()
        };
        let out = run(&[Turn::user("ann@x.com")], current);
        assert!(out.missing.contains(&Field::Service));
        assert_eq!(out.reply, "Thank you! What's the best phone number to reach you?");
    }

    #[test]
    fn test_last_turn_from_assistant_is_still_read() {
        let out = run(&[Turn::assistant("Training Session")], Appointment::default());
        assert_eq!(out.appointment.service.as_deref(), Some("Training Session"));
    }

    #[test]
    fn test_empty_string_fields_still_greet() {
        let current = Appointment {
            service: Some(String::new()),
            name: Some(String::new()),
            email: Some(String::new()),
            ..Default::default()
        };
        let out = run(&[Turn::user("hello")], current.clone());
        assert_eq!(out.state, DialogueState::Greeting);
        assert_eq!(out.missing, Field::ALL.to_vec());
        assert!(out.reply.starts_with("Great! I'd be happy to help"));
        assert_eq!(out.appointment, current);
    }

    #[test]
    fn test_empty_string_field_gets_filled() {
        let current = Appointment {
            service: Some(String::new()),
            ..Default::default()
        };
        let out = run(&[Turn::user("a sales demo")], current);
        assert_eq!(out.appointment.service.as_deref(), Some("Sales Demo"));
        assert!(out.reply.starts_with("Thank you!"));
    }

    #[test]
    fn test_unrenderable_date_format_leaves_date_empty() {
        let planner = Planner::new(ServiceCatalog::default(), "%Y-%m-%d %H:%M");
        let out = planner
            .advance_on(&[Turn::user("see you tomorrow")], Appointment::default(), today())
            .unwrap();
        assert_eq!(out.appointment.date, None);
        assert_eq!(out.state, DialogueState::Greeting);
    }

    #[test]
    fn test_uppercase_input_keeps_casing() {
        let mut current = full();
        current.email = None;
        current.time = None;
        let out = run(&[Turn::user("John@X.com, 3:00 PM")], current);
        assert_eq!(out.appointment.email.as_deref(), Some("John@X.com"));
        assert_eq!(out.appointment.time.as_deref(), Some("3:00 PM"));
        assert_eq!(out.state, DialogueState::Confirmation);
    }

    #[test]
    fn test_notes_carried_through() {
        let current = Appointment {
            notes: Some("wheelchair access".to_string()),
            ..Default::default()
        };
        let out = run(&[Turn::user("hi")], current);
        assert_eq!(out.appointment.notes.as_deref(), Some("wheelchair access"));
        assert_eq!(out.state, DialogueState::Greeting);
    }

    #[test]
    fn test_custom_date_format() {
        let planner = Planner::new(ServiceCatalog::default(), "%Y-%m-%d");
        let out = planner
            .advance_on(&[Turn::user("today please")], Appointment::default(), today())
            .unwrap();
        assert_eq!(out.appointment.date.as_deref(), Some("2026-10-18"));
    }

    #[test]
    fn test_free_function_uses_defaults() {
        let out = advance(&[Turn::user("strategy meeting")], Appointment::default()).unwrap();
        assert_eq!(out.appointment.service.as_deref(), Some("Strategy Meeting"));
        assert!(matches!(advance(&[], Appointment::default()), Err(DialogueError::EmptyHistory)));
    }
}
