use anyhow::{anyhow, Result};

use marquee_core::backend::{ContactFields, ContactForm, FormStatus, HttpSubmitter};
use marquee_core::AppConfig;

pub async fn run(config: &AppConfig, fields: ContactFields) -> Result<()> {
    let submitter = HttpSubmitter::new(config)?;
    let mut form = ContactForm::with_fields(fields);

    println!("Sending message...");
    let status = form.submit_with(&submitter).await.clone();
    let message = form.message().unwrap_or_default();

    match status {
        FormStatus::Succeeded => {
            println!("{}", message);
            Ok(())
        }
        FormStatus::Invalid(_) => Err(anyhow!("{}", message)),
        FormStatus::Failed(reason) => Err(anyhow!("{}\n({})", message, reason)),
        FormStatus::Idle | FormStatus::Submitting => Err(anyhow!("Submission did not complete")),
    }
}
