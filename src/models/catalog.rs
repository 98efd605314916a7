const SERVICES: [&str; 6] = [
    "Consultation",
    "Follow-up Meeting",
    "Technical Support",
    "Sales Demo",
    "Training Session",
    "Strategy Meeting",
];

const TIME_SLOTS: [&str; 9] = [
    "9:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "1:00 PM", "2:00 PM", "3:00 PM", "4:00 PM",
    "5:00 PM",
];

/// Bookable services and offered time slots. Read-only once built.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<String>,
    time_slots: Vec<String>,
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self {
            services: SERVICES.iter().map(|s| s.to_string()).collect(),
            time_slots: TIME_SLOTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ServiceCatalog {
    /// First service, in catalog order, whose name appears anywhere in `text`.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.services
            .iter()
            .find(|s| haystack.contains(&s.to_lowercase()))
            .map(String::as_str)
    }

    /// "1. Consultation\n2. Follow-up Meeting\n..."
    pub fn numbered_list(&self) -> String {
        self.services
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {s}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// "from 9:00 AM to 5:00 PM", or `None` when no slots are configured.
    pub fn availability_window(&self) -> Option<String> {
        let first = self.time_slots.first()?;
        let last = self.time_slots.last()?;
        Some(format!("from {first} to {last}"))
    }
}
