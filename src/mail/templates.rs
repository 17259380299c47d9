//! HTML bodies for outgoing mail. Inputs are interpolated as-is.

const STYLE: &str = r#"
      body { font-family: Georgia, serif; background: #0a0a0a; color: #f5f5f5; padding: 40px; }
      .container { max-width: 600px; margin: 0 auto; }
      h1 { color: #dc2626; font-size: 28px; margin-bottom: 20px; }
      p { line-height: 1.8; color: #a3a3a3; }
      .highlight { color: #f5f5f5; }
      .content { white-space: pre-wrap; }
      .footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #262626; font-size: 12px; }
"#;

const FOOTER: &str = r#"<div class="footer"><p>The AI Social Klub &bull; Baltimore, MD</p></div>"#;

pub const RSVP_CONFIRMATION_SUBJECT: &str = "RSVP Confirmed - AI Social Klub";

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"container\">\n{body}\n{FOOTER}\n</div>\n</body>\n</html>\n"
    )
}

/// Mass email body. Line breaks in `message` become `<br>`; nothing is escaped.
pub fn mass_email(subject: &str, message: &str) -> String {
    page(&format!(
        "<h1>{}</h1>\n<div class=\"content\">{}</div>",
        subject,
        message.replace('\n', "<br>")
    ))
}

/// Guest-facing RSVP confirmation with the fixed event details
pub fn rsvp_confirmation(name: &str) -> String {
    page(&format!(
        r#"<h1>Welcome, {name}!</h1>
<p>Your RSVP for <span class="highlight">The AI Social Klub</span> has been confirmed.</p>
<p>We're excited to have you join us for an unforgettable experience of brotherhood, games, drinks, and fellowship.</p>
<p><strong class="highlight">Event Details:</strong><br>
AI Game Night<br>
January 18, 2026 @ 3PM<br>
1041 West Baltimore St., Baltimore, MD</p>
<p>See you there!</p>"#
    ))
}

pub fn rsvp_notification_subject(name: &str) -> String {
    format!("New RSVP: {}", name)
}

/// Operator notification listing the submitted fields
pub fn rsvp_notification(name: &str, email: &str, phone: &str, received_at: &str) -> String {
    format!(
        "<h2>New RSVP Received</h2>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <p><strong>Phone:</strong> {phone}</p>\n\
         <p><strong>Time:</strong> {received_at}</p>\n"
    )
}
