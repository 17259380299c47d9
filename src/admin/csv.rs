//! CSV export of RSVPs and newsletter subscribers.
//!
//! Every field is wrapped in double quotes. Quotes inside values are written
//! through unescaped, so a value containing `"` yields a malformed line.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{Rsvp, Subscriber};

pub const RSVP_HEADER: &str = "Name,Email,Phone,Date";
pub const SUBSCRIBER_HEADER: &str = "Email,Date";

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn quoted_line(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| format!("\"{}\"", f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

pub fn rsvps_csv(rsvps: &[Rsvp]) -> String {
    let mut out = format!("{}\n", RSVP_HEADER);
    for r in rsvps {
        out.push_str(&quoted_line(&[
            r.name.as_str(),
            r.email.as_str(),
            r.phone.as_str(),
            timestamp(&r.created_at).as_str(),
        ]));
    }
    out
}

pub fn subscribers_csv(subscribers: &[Subscriber]) -> String {
    let mut out = format!("{}\n", SUBSCRIBER_HEADER);
    for s in subscribers {
        out.push_str(&quoted_line(&[s.email.as_str(), timestamp(&s.created_at).as_str()]));
    }
    out
}
