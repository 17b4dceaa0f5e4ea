//! Newsletter and contact command handlers

use super::Sources;
use crate::config::Config;
use crate::queries::{ContactForm, NewsletterSignup};

pub async fn cmd_subscribe(config: &Config, email: &str) -> anyhow::Result<()> {
    let sources = Sources::from_config(config)?;
    let signup = NewsletterSignup::new(sources.content);

    match signup.subscribe(email).await {
        Ok(receipt) => {
            println!("✓ Subscribed {}", email.trim());
            if !receipt.message.is_empty() {
                println!("  {}", receipt.message);
            }
            Ok(())
        }
        Err(e) => {
            println!("✗ Subscription failed: {}", e);
            Err(e.into())
        }
    }
}

pub async fn cmd_contact(
    config: &Config,
    name: &str,
    email: &str,
    message: &str,
) -> anyhow::Result<()> {
    let sources = Sources::from_config(config)?;
    let form = ContactForm::new(sources.content);

    match form.submit(name, email, message).await {
        Ok(receipt) => {
            println!("✓ Message sent");
            if !receipt.message.is_empty() {
                println!("  {}", receipt.message);
            }
            Ok(())
        }
        Err(e) => {
            println!("✗ Message not sent: {}", e);
            Err(e.into())
        }
    }
}
