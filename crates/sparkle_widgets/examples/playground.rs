//! AI Input Playground
//!
//! Drives the four demo widgets headlessly:
//! - AiTextbox generating a product name
//! - AiTextbox with an action menu
//! - AiTextarea generating a description
//! - AiCombobox picking a framework
//!
//! A background task ticks the frame scheduler at ~60 fps so the accent
//! rotates while each request is in flight.
//!
//! Run with: cargo run -p sparkle_widgets --example playground [config.toml]

use std::sync::Arc;
use std::time::Duration;

use sparkle_widgets::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

const DESCRIPTION: &str = "These AI-enhanced input components bring intelligent text generation \
directly into your forms. Each component features an animated gradient border during generation, \
a loading spinner, and a one-click undo to restore the previous value.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SparkleConfig::load(path)?,
        None => SparkleConfig::default(),
    };

    let scheduler = Arc::new(FrameScheduler::new());
    set_global_scheduler(scheduler.handle());

    let frames = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(FRAME);
            loop {
                interval.tick().await;
                scheduler.tick(FRAME);
            }
        })
    };

    product_name(&config).await;
    titled_with_actions(&config).await;
    description(&config).await;
    framework_picker(&config).await;

    frames.abort();
    tracing::info!("Rendered {} frames", scheduler.frame_count());
    Ok(())
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

async fn product_name(config: &SparkleConfig) {
    let value = SharedValue::new("");
    let textbox = ai_textbox(value.binding())
        .placeholder("Enter a product name...")
        .config(config.clone())
        .generator(Generator::new(|| async {
            sleep_ms(1500).await;
            Ok(Some("Quantum Flux Capacitor".to_string()))
        }))
        .build();

    let generation = tokio::spawn(textbox.trigger_generation());
    sleep_ms(500).await;
    let view = textbox.view();
    tracing::info!(
        "AiTextbox: busy, icon {:?}, accent at {}°",
        view.field.button.icon,
        view.field.accent.map(|a| a.start_angle).unwrap_or(0)
    );

    if let Err(err) = generation.await {
        tracing::warn!("AiTextbox: generation task failed: {}", err);
    }
    tracing::info!("AiTextbox: value {:?}, undo available: {}", value.get(), textbox.has_undo());

    textbox.undo();
    tracing::info!("AiTextbox: after undo {:?}", value.get());
}

async fn titled_with_actions(config: &SparkleConfig) {
    let value = SharedValue::new("");
    let textbox = ai_textbox(value.binding())
        .placeholder("Enter a title...")
        .config(config.clone())
        .action("Generate title", "generate")
        .action("Improve title", "improve")
        .action("Make shorter", "shorten")
        .generator(Generator::with_action(|action| async move {
            sleep_ms(1500).await;
            let title = match action.as_deref() {
                Some("generate") => "How to Build AI-Powered React Components",
                Some("improve") => "Building Next-Generation AI-Powered React Components",
                Some("shorten") => "AI React Components",
                _ => "AI-Enhanced Input Components",
            };
            Ok(Some(title.to_string()))
        }))
        .build();

    for action in textbox.actions() {
        textbox.toggle_action_menu();
        textbox.choose_action(&action.value).await;
        tracing::info!("AiTextbox ({}): {:?}", action.label, value.get());
    }
}

async fn description(config: &SparkleConfig) {
    let value = SharedValue::new("");
    let textarea = ai_textarea(value.binding())
        .placeholder("Write a description...")
        .config(config.clone())
        .generator(Generator::new(|| async {
            sleep_ms(2000).await;
            Ok(Some(DESCRIPTION.to_string()))
        }))
        .build();

    textarea.trigger_generation().await;
    tracing::info!(
        "AiTextarea: {} characters, undo available: {}",
        value.get().len(),
        textarea.has_undo()
    );
}

async fn framework_picker(config: &SparkleConfig) {
    let options = vec![
        SelectOption::new("react", "React"),
        SelectOption::new("vue", "Vue"),
        SelectOption::new("svelte", "Svelte"),
        SelectOption::new("angular", "Angular"),
        SelectOption::new("solid", "SolidJS"),
        SelectOption::new("htmx", "HTMX"),
    ];

    let value = SharedValue::new("");
    let combobox = ai_combobox(value.binding(), options)
        .placeholder("Pick a framework...")
        .config(config.clone())
        .generator(Generator::new(|| async {
            sleep_ms(1500).await;
            Ok(Some("react".to_string()))
        }))
        .build();

    combobox.focus();
    combobox.set_search_text("s");
    let labels: Vec<String> = combobox
        .visible_options()
        .into_iter()
        .map(|option| option.label)
        .collect();
    tracing::info!("AiCombobox: \"s\" matches {:?}", labels);

    combobox.select_value("svelte");
    tracing::info!("AiCombobox: selected {:?}", combobox.display_text());

    combobox.trigger_generation().await;
    tracing::info!("AiCombobox: generated {:?}", combobox.display_text());

    combobox.undo();
    tracing::info!("AiCombobox: after undo {:?}", combobox.display_text());
}
