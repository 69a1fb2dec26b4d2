//! Email bodies for registration notifications

use shared::models::Registration;
use shared::util::millis_to_datetime;

use super::EmailMessage;

const DATE_FORMAT: &str = "%B %d, %Y at %I:%M %p";

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_date(millis: i64) -> String {
    millis_to_datetime(millis)
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Event lines as `Name` or `Name (sub-option)`
fn event_lines(registration: &Registration) -> Vec<String> {
    registration
        .selected_event_names()
        .into_iter()
        .map(|event| {
            if event.sub_option.is_empty() {
                event.name
            } else {
                format!("{} ({})", event.name, event.sub_option)
            }
        })
        .collect()
}

/// Sent to the attendee after the `pending → paid` transition
pub fn confirmation(site_name: &str, registration: &Registration) -> EmailMessage {
    let subject = format!("Registration Confirmed - {site_name}");
    let registered_on = format_date(registration.registration_date);
    let events = event_lines(registration);

    let details = [
        ("Name", registration.name.as_str()),
        ("Email", registration.email.as_str()),
        ("Phone", registration.phone.as_str()),
        ("College", registration.college.as_str()),
        ("Department", registration.department.as_str()),
    ];
    let fee = format!("₹{}", registration.registration_fee);

    let mut html = String::new();
    html.push_str("<html>\n<body>\n<h2>Registration Confirmed!</h2>\n");
    html.push_str(&format!(
        "<p>Dear {},</p>\n<p>Thank you for registering for the {}. Your registration has been confirmed.</p>\n",
        escape_html(&registration.name),
        escape_html(site_name)
    ));
    html.push_str("<h3>Registration Details:</h3>\n<ul>\n");
    for (label, value) in details {
        html.push_str(&format!(
            "<li><strong>{label}:</strong> {}</li>\n",
            escape_html(value)
        ));
    }
    html.push_str(&format!("<li><strong>Registration Fee:</strong> {fee}</li>\n"));
    html.push_str("<li><strong>Payment Status:</strong> Paid</li>\n");
    html.push_str(&format!(
        "<li><strong>Registration Date:</strong> {registered_on}</li>\n</ul>\n"
    ));
    if !events.is_empty() {
        html.push_str("<h3>Selected Events:</h3>\n<ul>\n");
        for line in &events {
            html.push_str(&format!("<li>{}</li>\n", escape_html(line)));
        }
        html.push_str("</ul>\n");
    }
    html.push_str(&format!(
        "<p>We look forward to seeing you at the symposium!</p>\n<p>Best regards,<br>{} Team</p>\n</body>\n</html>\n",
        escape_html(site_name)
    ));

    let mut text = format!(
        "Registration Confirmed!\n\nDear {},\n\nThank you for registering for the {site_name}. \
         Your registration has been confirmed.\n\nRegistration Details:\n",
        registration.name
    );
    for (label, value) in details {
        text.push_str(&format!("- {label}: {value}\n"));
    }
    text.push_str(&format!("- Registration Fee: {fee}\n"));
    text.push_str("- Payment Status: Paid\n");
    text.push_str(&format!("- Registration Date: {registered_on}\n"));
    if !events.is_empty() {
        text.push_str("\nSelected Events:\n");
        for line in &events {
            text.push_str(&format!("- {line}\n"));
        }
    }
    text.push_str(&format!(
        "\nWe look forward to seeing you at the symposium!\n\nBest regards,\n{site_name} Team\n"
    ));

    EmailMessage {
        to: registration.email.clone(),
        subject,
        text,
        html: Some(html),
    }
}

/// Sent to the organisers when a registration is created
pub fn admin_alert(admin_email: &str, registration: &Registration) -> EmailMessage {
    EmailMessage {
        to: admin_email.to_string(),
        subject: format!("New Registration Alert - {}", registration.name),
        text: format!(
            "New registration received from {} ({}) from {}\n\nEvents: {}\nRegistered: {}\n",
            registration.name,
            registration.email,
            registration.college,
            event_lines(registration).join(", "),
            format_date(registration.registration_date),
        ),
        html: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use shared::models::{EventDetail, PaymentStatus};

    fn registration() -> Registration {
        Registration {
            id: 1,
            name: "Ann <script>".into(),
            phone: "9876543210".into(),
            email: "a@b.com".into(),
            college: "X".into(),
            department: "CS".into(),
            registration_fee: Decimal::new(50000, 2),
            payment_status: PaymentStatus::Paid,
            order_id: Some("order_1".into()),
            payment_id: Some("pay_1".into()),
            // 2025-03-01 14:05:00 UTC
            registration_date: 1_740_837_900_000,
            payment_date: Some(1_740_837_960_000),
            num_events: 2,
            selected_events: vec![1, 3],
            event_details: vec![EventDetail {
                event_id: json!(1),
                sub_option: "Morning".into(),
            }],
        }
    }

    #[test]
    fn test_confirmation_content() {
        let msg = confirmation("Zehinix Symposium", &registration());
        assert_eq!(msg.to, "a@b.com");
        assert_eq!(msg.subject, "Registration Confirmed - Zehinix Symposium");
        assert!(msg.text.contains("- Registration Fee: ₹500.00"));
        assert!(msg.text.contains("March 01, 2025 at 02:05 PM"));
        assert!(msg.text.contains("- AI Workshop (Morning)"));
        assert!(msg.text.contains("- Web3 Development\n"));

        let html = msg.html.unwrap();
        assert!(html.contains("Ann &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_admin_alert_content() {
        let msg = admin_alert("admin@example.com", &registration());
        assert_eq!(msg.to, "admin@example.com");
        assert_eq!(msg.subject, "New Registration Alert - Ann <script>");
        assert!(msg.text.contains("(a@b.com) from X"));
        assert!(msg.html.is_none());
    }
}
