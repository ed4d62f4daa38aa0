//! In-memory stand-in for the page's countdown badge element: one data
//! attribute, a class list, and inner HTML, mutated the same way the page
//! mutates the real element.

use std::collections::BTreeMap;

use lockbadge_shared::countdown::{self, DisplayState, Tier, TickOutcome};

#[derive(Debug, Clone, Default)]
pub struct Badge {
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    html: String,
}

impl Badge {
    /// A fresh badge the way the page renders it: success styling and the
    /// counter seeded into the data attribute.
    pub fn with_remaining(seconds: i64) -> Self {
        let mut badge = Self {
            classes: vec!["badge".to_string(), "bg-success".to_string()],
            ..Self::default()
        };
        badge.set_attr(countdown::REMAINING_ATTR, &seconds.to_string());
        badge
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn set_html(&mut self, html: String) {
        self.html = html;
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Tier implied by the stored attribute value.
    pub fn tier(&self) -> Tier {
        match countdown::parse_remaining(self.attr(countdown::REMAINING_ATTR)) {
            Some(t) => Tier::of(t),
            None => Tier::Locked,
        }
    }
}

/// One tick of the countdown badge: decrement, reformat, restyle. A missing
/// badge is a silent no-op; pages without the widget run this too.
pub fn update_countdown(badge: Option<&mut Badge>) {
    let Some(badge) = badge else {
        return;
    };
    let parsed = countdown::parse_remaining(badge.attr(countdown::REMAINING_ATTR));
    let TickOutcome { write_back, display } = countdown::tick(parsed);
    if let Some(value) = write_back {
        badge.set_attr(countdown::REMAINING_ATTR, &value.to_string());
    }
    apply(badge, &display);
}

fn apply(badge: &mut Badge, display: &DisplayState) {
    let tier = display.tier();
    for class in tier.classes_to_remove() {
        badge.remove_class(class);
    }
    for class in tier.classes_to_add() {
        badge.add_class(class);
    }
    badge.set_html(display.html());
}
