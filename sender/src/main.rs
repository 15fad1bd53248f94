use std::path::PathBuf;

use structopt::StructOpt;

use mailpost::email::Attachment;
use mailpost::{Backend, Transport};

mod message;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mailpost-send",
    about = "Send one email through Postmark or PostageApp."
)]
pub struct Opt {
    /// Transport to use: postmark or postageapp
    #[structopt(short, long, default_value = "postmark")]
    backend: Backend,

    /// Config file (defaults to /etc/mailpost/mailpost.toml)
    #[structopt(short, long)]
    config: Option<String>,

    #[structopt(short, long)]
    from: String,

    #[structopt(short, long, required = true)]
    to: Vec<String>,

    #[structopt(long)]
    cc: Vec<String>,

    #[structopt(long)]
    bcc: Vec<String>,

    #[structopt(long)]
    reply_to: Option<String>,

    #[structopt(short, long)]
    subject: Option<String>,

    /// Sent as X-Tag
    #[structopt(long)]
    tag: Option<String>,

    /// Plain text body. Read from stdin if neither --text nor --html is given.
    #[structopt(long, parse(from_os_str))]
    text: Option<PathBuf>,

    /// HTML body
    #[structopt(long, parse(from_os_str))]
    html: Option<PathBuf>,

    /// PATH or PATH:MIME
    #[structopt(short, long, parse(try_from_str = message::parse_attachment))]
    attach: Vec<Attachment>,

    /// Extra header as NAME:VALUE
    #[structopt(long, parse(try_from_str = message::parse_header))]
    header: Vec<(String, String)>,
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let config = mailpost::config::load_config(opt.config.as_deref())?;
    let transport = opt.backend.transport(&config)?;

    let email = message::build(&opt, &mut std::io::stdin())?;

    log::info!(
        "Sending \"{}\" to {} via {}",
        email.header("Subject").unwrap_or_default(),
        email.header("To").unwrap_or_default(),
        opt.backend
    );

    let result = transport.send(&email)?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn main() {
    // Init logger
    env_logger::builder().format_timestamp_micros().init();

    let opt = Opt::from_args();

    if let Err(e) = run(opt) {
        log::error!("Failed to send email: {}", e);
        std::process::exit(1);
    }
}
