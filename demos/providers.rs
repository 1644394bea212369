//! Providers demo - wiring an email service through the four provider strategies
//!
//! This example demonstrates:
//! - Value, class, alias and factory providers
//! - Singleton-per-injector behavior of factories
//! - Alias identity
//! - Environment-dependent factories
//! - Child injectors and options loaded from the environment
//!
//! Run with `RUST_LOG=debug cargo run --example providers` to see resolution events.

use ferrous_providers::*;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

trait EmailService: Send + Sync {
    fn vendor(&self) -> &'static str;
    fn send(&self, to: &str, body: &str) -> String;
}

struct Mandrill {
    api_key: Arc<String>,
}

impl EmailService for Mandrill {
    fn vendor(&self) -> &'static str {
        "mandrill"
    }

    fn send(&self, to: &str, body: &str) -> String {
        format!("[mandrill key={}] to {}: {}", self.api_key, to, body)
    }
}

struct SendGrid;

impl EmailService for SendGrid {
    fn vendor(&self) -> &'static str {
        "sendgrid"
    }

    fn send(&self, to: &str, body: &str) -> String {
        format!("[sendgrid] to {}: {}", to, body)
    }
}

#[derive(Default)]
struct Clock;

fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = InjectorOptions::from_env()?;
    println!("Options: {:?}", options);

    let production = env::var("APP_ENV").map(|v| v == "production").unwrap_or(true);
    let factory_calls = Arc::new(AtomicUsize::new(0));
    let calls = factory_calls.clone();

    let email_token = Token::of::<dyn EmailService>();

    let injector = Injector::builder()
        .options(options)
        .observer(Arc::new(TracingObserver::new()))
        .provide(ProviderDefinition::provide("APIKey").use_value(String::from("XYZ1234ABC")))
        .provide(ProviderDefinition::class::<Clock>())
        .provide(
            ProviderDefinition::provide(&email_token).use_factory_with_deps(["APIKey"], move |deps| {
                calls.fetch_add(1, Ordering::SeqCst);
                let service: Arc<dyn EmailService> = if production {
                    Arc::new(Mandrill { api_key: deps.get::<String>(0)? })
                } else {
                    Arc::new(SendGrid)
                };
                Ok(service)
            }),
        )
        .provide(ProviderDefinition::provide("Mailer").use_existing(&email_token))
        .build()?;

    // Value provider
    let key = injector.get_as::<String>("APIKey")?;
    println!("APIKey = {}", key);

    // Factory runs once, alias shares the instance
    let email = injector.get_trait::<dyn EmailService>(&email_token)?;
    let mailer = injector.get_trait::<dyn EmailService>("Mailer")?;
    println!("{}", email.send("ada@example.com", "hello"));
    println!(
        "vendor={} same instance={} factory calls={}",
        mailer.vendor(),
        Arc::ptr_eq(&email, &mailer),
        factory_calls.load(Ordering::SeqCst)
    );

    // Type token with a class provider
    injector.get_type::<Clock>()?;

    // Child injector overrides the email service for a test context
    let test_context = injector.create_child(vec![
        ProviderDefinition::provide(&email_token).use_value(Arc::new(SendGrid) as Arc<dyn EmailService>),
    ])?;
    let test_email = test_context.get_trait::<dyn EmailService>(&email_token)?;
    println!("child vendor={}", test_email.vendor());

    // Errors surface unchanged
    match injector.get("SmsService") {
        Err(e) => println!("Expected error: {}", e),
        Ok(_) => println!("SmsService unexpectedly registered"),
    }

    for descriptor in injector.descriptors() {
        println!("  {} ({})", descriptor.display_name(), descriptor.kind);
    }

    let report = injector.validate();
    println!("validation ok: {}", report.is_ok());

    Ok(())
}
