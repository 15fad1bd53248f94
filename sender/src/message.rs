use std::io::Read;

use mailpost::email::{Attachment, EmailFormat, EmailMessage};

use crate::Opt;

/// Parse `PATH` or `PATH:MIME`. The suffix only counts as a MIME type
/// if it looks like one.
pub fn parse_attachment(s: &str) -> Result<Attachment, String> {
    let (path, mimetype) = match s.rfind(':') {
        Some(i) if s[i + 1..].contains('/') && i > 0 => (&s[..i], Some(&s[i + 1..])),
        _ => (s, None),
    };

    if path.is_empty() {
        return Err(format!("Invalid attachment: {}", s));
    }

    Ok(Attachment::from_path(path, mimetype))
}

/// Parse `NAME:VALUE`
pub fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.find(':') {
        Some(i) if i > 0 => Ok((s[..i].trim().to_string(), s[i + 1..].trim().to_string())),
        _ => Err(format!("Invalid header: {}", s)),
    }
}

/// Assemble the outgoing email from command line options.
/// `stdin` supplies the text body when no body file is given.
pub fn build(opt: &Opt, stdin: &mut impl Read) -> Result<EmailMessage, Box<dyn std::error::Error>> {
    let mut email = EmailMessage::new().with_from(opt.from.as_str());

    for to in &opt.to {
        email = email.with_to(to.as_str());
    }

    for cc in &opt.cc {
        email = email.with_cc(cc.as_str());
    }

    for bcc in &opt.bcc {
        email = email.with_bcc(bcc.as_str());
    }

    if let Some(ref reply_to) = opt.reply_to {
        email = email.with_reply_to(reply_to.as_str());
    }

    if let Some(ref subject) = opt.subject {
        email = email.with_subject(subject);
    }

    if let Some(ref tag) = opt.tag {
        email = email.with_header("X-Tag", tag);
    }

    for (name, value) in &opt.header {
        email = email.with_header(name, value);
    }

    let format = match (&opt.text, &opt.html) {
        (Some(_), Some(_)) => EmailFormat::Both,
        (None, Some(_)) => EmailFormat::Html,
        _ => EmailFormat::Text,
    };
    email = email.with_format(format);

    match opt.text {
        Some(ref path) => email = email.with_text(&std::fs::read_to_string(path)?),
        None if opt.html.is_none() => {
            let mut body = String::new();
            stdin.read_to_string(&mut body)?;
            email = email.with_text(&body);
        }
        None => (),
    }

    if let Some(ref path) = opt.html {
        email = email.with_html(&std::fs::read_to_string(path)?);
    }

    for attachment in &opt.attach {
        email = email.with_attachment(attachment.clone());
    }

    Ok(email)
}
