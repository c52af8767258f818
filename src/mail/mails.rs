use super::sendmail::send_email;

pub async fn send_otp_email(
    to_email: &str,
    username: &str,
    otp_code: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let subject = "Your Fixnest Verification Code";
    let template_path = "src/mail/templates/OTP-email.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{otp_code}}".to_string(), otp_code.to_string()),
    ];

    send_email(to_email, subject, template_path, &placeholders).await
}

pub async fn send_provider_status_email(
    to_email: &str,
    username: &str,
    approved: bool,
    reason: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let subject = if approved {
        "Your Provider Profile Is Approved"
    } else {
        "Your Provider Profile Was Rejected"
    };

    let template_path = "src/mail/templates/Provider-Status.html";

    let status_display = if approved { "Approved" } else { "Rejected" };

    let mut placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{status_display}}".to_string(), status_display.to_string()),
    ];

    if let Some(notes) = reason {
        placeholders.push(("{{reason}}".to_string(), notes.to_string()));
    } else {
        placeholders.push(("{{reason}}".to_string(), "".to_string()));
    }

    send_email(to_email, subject, template_path, &placeholders).await
}
