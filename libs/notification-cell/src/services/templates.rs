//! HTML bodies for outgoing mail. Every interpolated value is escaped.

pub const VERIFICATION_SUBJECT: &str = "Welcome to Prodia";
pub const LOGIN_ALERT_SUBJECT: &str = "Successful Login Notification";
pub const RECORD_COPY_SUBJECT: &str = "Your Medical Record from Prodia";
pub const RECORD_ATTACHMENT_NAME: &str = "medical_record.pdf";

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
</head>
<body style="margin:0;padding:0;background:#f4f6f8;font-family:Arial,Helvetica,sans-serif;color:#1f2933;">
  <table width="100%" cellpadding="0" cellspacing="0" style="padding:32px 0;">
    <tr>
      <td align="center">
        <table width="560" cellpadding="0" cellspacing="0" style="background:#ffffff;border-radius:8px;padding:32px;">
          <tr><td>
{body}
          </td></tr>
        </table>
        <p style="font-size:12px;color:#7b8794;">Prodia Clinic</p>
      </td>
    </tr>
  </table>
</body>
</html>"#,
        title = escape_html(title),
        body = body
    )
}

pub fn verification_email(name: &str, link: &str) -> String {
    let body = format!(
        r#"            <h2 style="margin-top:0;">Hello, {name}</h2>
            <p>Thank you for registering. Please confirm your email address to activate your account.</p>
            <p style="text-align:center;margin:32px 0;">
              <a href="{link}" style="background:#0b7285;color:#ffffff;padding:12px 24px;border-radius:4px;text-decoration:none;">Verify Account</a>
            </p>
            <p style="font-size:13px;color:#52606d;">If the button does not work, open this link: {link}</p>"#,
        name = escape_html(name),
        link = escape_html(link)
    );
    layout(VERIFICATION_SUBJECT, &body)
}

pub fn login_alert_email(name: &str, signed_in_at: &str) -> String {
    let body = format!(
        r#"            <h2 style="margin-top:0;">Hello, {name}</h2>
            <p>Your account was signed in successfully at {when}.</p>
            <p>If this was not you, change your password immediately.</p>"#,
        name = escape_html(name),
        when = escape_html(signed_in_at)
    );
    layout(LOGIN_ALERT_SUBJECT, &body)
}

pub fn record_copy_email(patient_name: &str) -> String {
    let body = format!(
        r#"            <h2 style="margin-top:0;">Dear {name},</h2>
            <p>Attached is a copy of the medical record from your recent visit.</p>
            <p>Please keep it for your reference and follow the care suggestion from your doctor.</p>"#,
        name = escape_html(patient_name)
    );
    layout(RECORD_COPY_SUBJECT, &body)
}
