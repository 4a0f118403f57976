//! End-to-end widget scenarios driven by a paused tokio clock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sparkle_widgets::prelude::*;
use tokio::sync::Notify;

const FRAME: Duration = Duration::from_millis(16);

fn delayed_generator(text: &'static str, delay: Duration) -> (Generator, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let generator = Generator::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::time::sleep(delay).await;
            Ok(Some(text.to_string()))
        }
    });
    (generator, calls)
}

/// A generator that finishes only when the test releases it
fn gated_generator(text: &'static str) -> (Generator, Arc<Notify>) {
    let gate = Arc::new(Notify::new());
    let waiter = gate.clone();
    let generator = Generator::new(move || {
        let waiter = waiter.clone();
        async move {
            waiter.notified().await;
            Ok(Some(text.to_string()))
        }
    });
    (generator, gate)
}

#[tokio::test(start_paused = true)]
async fn test_generate_then_undo_round_trip() {
    let name = SharedValue::new("");
    let (generator, calls) =
        delayed_generator("Quantum Flux Capacitor", Duration::from_millis(1500));
    let textbox = ai_textbox(name.binding())
        .placeholder("Enter a product name...")
        .generator(generator)
        .build();

    let generation = tokio::spawn(textbox.trigger_generation());
    assert!(textbox.is_busy());
    assert!(textbox.is_accented());
    assert!(!textbox.has_undo());

    // A second trigger while busy changes nothing
    textbox.trigger_generation().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(textbox.generation_count(), 1);
    assert!(textbox.is_busy());

    generation.await.unwrap();
    assert!(!textbox.is_busy());
    assert!(!textbox.is_accented());
    assert_eq!(textbox.value(), "Quantum Flux Capacitor");
    assert!(textbox.has_undo());
    assert_eq!(textbox.undo_value().as_deref(), Some(""));
    assert_eq!(name.change_count(), 1);

    textbox.undo();
    assert_eq!(textbox.value(), "");
    assert!(!textbox.has_undo());

    textbox.undo();
    assert_eq!(textbox.value(), "");
    assert_eq!(name.change_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_generation_waits_for_callback() {
    let name = SharedValue::new("draft");
    let (generator, _) = delayed_generator("generated", Duration::from_millis(1500));
    let textbox = ai_textbox(name.binding()).generator(generator).build();

    let generation = tokio::spawn(textbox.trigger_generation());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(textbox.is_busy());
    assert_eq!(textbox.value(), "draft");

    tokio::time::sleep(Duration::from_millis(600)).await;
    generation.await.unwrap();
    assert_eq!(textbox.value(), "generated");
}

#[tokio::test]
async fn test_typing_while_busy_is_allowed() {
    let name = SharedValue::new("draft");
    let (generator, gate) = gated_generator("generated");
    let textarea = ai_textarea(name.binding()).generator(generator).build();

    let generation = tokio::spawn(textarea.trigger_generation());
    textarea.input("edited meanwhile");
    assert_eq!(name.get(), "edited meanwhile");

    gate.notify_one();
    generation.await.unwrap();
    assert_eq!(name.get(), "generated");

    // Undo restores what the field held when the trigger was pressed
    textarea.undo();
    assert_eq!(name.get(), "draft");
}

#[tokio::test]
async fn test_accent_rotates_only_while_busy() {
    let scheduler = FrameScheduler::new();
    let name = SharedValue::new("");
    let (generator, gate) = gated_generator("generated");
    let textarea = ai_textarea(name.binding())
        .generator(generator)
        .scheduler(scheduler.handle())
        .build();

    scheduler.tick(FRAME);
    assert_eq!(textarea.accent_angle(), 0);
    assert!(textarea.view().field.accent.is_none());

    let generation = tokio::spawn(textarea.trigger_generation());
    for expected in [2, 4, 6] {
        scheduler.tick(FRAME);
        assert_eq!(textarea.accent_angle(), expected);
    }
    assert_eq!(textarea.view().field.accent.unwrap().start_angle, 6);

    gate.notify_one();
    generation.await.unwrap();
    assert!(!textarea.is_accented());
    assert_eq!(textarea.accent_angle(), 0);
    assert_eq!(scheduler.frame_callback_count(), 0);

    scheduler.tick(FRAME);
    assert_eq!(textarea.accent_angle(), 0);
}

#[tokio::test]
async fn test_configured_step() {
    let scheduler = FrameScheduler::new();
    let name = SharedValue::new("");
    let config = SparkleConfig::from_toml_str("[accent]\nstep_degrees = 5").unwrap();
    let textbox = ai_textbox(name.binding())
        .scheduler(scheduler.handle())
        .config(config)
        .build();

    let generation = textbox.trigger_generation();
    scheduler.tick(FRAME);
    scheduler.tick(FRAME);
    assert_eq!(textbox.accent_angle(), 10);
    generation.await;
    assert_eq!(textbox.accent_angle(), 0);
}

#[tokio::test]
async fn test_invalid_accent_config_falls_back_to_defaults() {
    let scheduler = FrameScheduler::new();
    let name = SharedValue::new("");
    let mut config = SparkleConfig::default();
    config.accent.colors = vec!["not a color".to_string()];
    config.accent.step_degrees = 0;

    let textbox = ai_textbox(name.binding())
        .scheduler(scheduler.handle())
        .config(config)
        .build();

    let generation = textbox.trigger_generation();
    scheduler.tick(FRAME);
    assert_eq!(textbox.accent_angle(), 2);
    assert_eq!(textbox.view().field.accent.unwrap().stops.len(), 8);
    generation.await;
}

#[tokio::test]
async fn test_failed_generation_still_offers_undo() {
    let name = SharedValue::new("keep me");
    let textbox = ai_textbox(name.binding())
        .generator(Generator::new(|| async {
            Err(GenerationError::failed("rate limited"))
        }))
        .build();

    textbox.trigger_generation().await;
    assert!(!textbox.is_busy());
    assert!(!textbox.is_accented());
    assert_eq!(name.get(), "keep me");
    assert_eq!(name.change_count(), 0);
    assert!(textbox.has_undo());

    textbox.undo();
    assert_eq!(name.get(), "keep me");
    assert_eq!(name.change_count(), 1);
    assert!(!textbox.has_undo());
}

#[tokio::test]
async fn test_anyhow_errors_convert_into_failures() {
    let name = SharedValue::new("keep me");
    let textbox = ai_textbox(name.binding())
        .generator(Generator::new(|| async {
            let response: anyhow::Result<String> = Err(anyhow::anyhow!("backend offline"));
            Ok::<_, GenerationError>(Some(response?))
        }))
        .build();

    textbox.trigger_generation().await;
    assert_eq!(name.get(), "keep me");
    assert!(textbox.has_undo());
}

#[tokio::test]
async fn test_no_text_produced_is_not_a_change() {
    let name = SharedValue::new("draft");
    let textbox = ai_textbox(name.binding())
        .generator(Generator::new(|| async { Ok(None) }))
        .build();

    textbox.trigger_generation().await;
    assert_eq!(name.change_count(), 0);
    assert!(textbox.has_undo());
    assert!(!textbox.is_busy());
}

#[tokio::test]
async fn test_without_generator_cycles_states() {
    let name = SharedValue::new("draft");
    let textbox = ai_textbox(name.binding()).build();

    textbox.trigger_generation().await;
    assert!(!textbox.is_busy());
    assert!(textbox.has_undo());
    assert_eq!(name.change_count(), 0);
}

#[tokio::test]
async fn test_new_generation_replaces_undo_target() {
    let name = SharedValue::new("first");
    let textbox = ai_textbox(name.binding())
        .generator(Generator::new(|| async { Ok(Some("generated".to_string())) }))
        .build();

    textbox.trigger_generation().await;
    textbox.input("second");
    textbox.trigger_generation().await;

    assert_eq!(textbox.undo_value().as_deref(), Some("second"));
    textbox.undo();
    assert_eq!(name.get(), "second");
}

#[tokio::test]
async fn test_multi_action_textbox() {
    let title = SharedValue::new("");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let textbox = ai_textbox(title.binding())
        .placeholder("Enter a title...")
        .action("Generate title", "generate")
        .action("Improve title", "improve")
        .action("Make shorter", "shorten")
        .generator(Generator::with_action(move |action| {
            log.lock().unwrap().push(action.clone());
            async move {
                let text = match action.as_deref() {
                    Some("generate") => "How to Build AI-Powered React Components",
                    Some("improve") => "Building Next-Generation AI-Powered React Components",
                    Some("shorten") => "AI React Components",
                    _ => "AI-Enhanced Input Components",
                };
                Ok(Some(text.to_string()))
            }
        }))
        .build();

    assert!(textbox.view().field.button.opens_menu);
    textbox.toggle_action_menu();
    assert_eq!(textbox.view().action_menu.map(|rows| rows.len()), Some(3));

    textbox.choose_action("shorten").await;
    assert!(!textbox.is_action_menu_open());
    assert_eq!(title.get(), "AI React Components");

    textbox.trigger_generation().await;
    assert_eq!(title.get(), "AI-Enhanced Input Components");

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some("shorten".to_string()), None]
    );
}

#[tokio::test]
async fn test_selector_generation_and_undo() {
    let framework = SharedValue::new("vue");
    let options = vec![
        SelectOption::new("react", "React"),
        SelectOption::new("vue", "Vue"),
        SelectOption::new("svelte", "Svelte"),
    ];
    let (generator, gate) = gated_generator("react");
    let combobox = ai_combobox(framework.binding(), options)
        .placeholder("Pick a framework...")
        .generator(generator)
        .build();

    combobox.focus();
    assert!(combobox.is_open());

    let generation = tokio::spawn(combobox.trigger_generation());
    assert!(!combobox.is_open());

    gate.notify_one();
    generation.await.unwrap();
    assert_eq!(combobox.value(), "react");
    assert_eq!(combobox.display_text(), "React");

    combobox.undo();
    assert_eq!(combobox.display_text(), "Vue");
}

#[test]
fn test_select_option_notifies_once() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let current = Arc::new(Mutex::new(String::new()));
    let reader = current.clone();
    let binding = ValueBinding::new(
        move || reader.lock().unwrap().clone(),
        move |event| {
            sink.lock().unwrap().push(event.value().to_string());
            *current.lock().unwrap() = event.value().to_string();
        },
    );

    let combobox = ai_combobox(
        binding,
        vec![
            SelectOption::new("react", "React"),
            SelectOption::new("vue", "Vue"),
            SelectOption::new("svelte", "Svelte"),
        ],
    )
    .build();

    combobox.set_search_text("v");
    let visible = combobox.visible_options();
    assert_eq!(visible, vec![SelectOption::new("vue", "Vue")]);

    combobox.select_option(&visible[0]);
    assert_eq!(combobox.value(), "vue");
    assert!(!combobox.is_open());
    assert_eq!(combobox.search_text(), "");
    assert_eq!(*events.lock().unwrap(), vec!["vue".to_string()]);
}

#[tokio::test]
async fn test_completion_after_drop_still_reaches_host() {
    let scheduler = FrameScheduler::new();
    let name = SharedValue::new("");
    let (generator, gate) = gated_generator("late text");
    let textbox = ai_textbox(name.binding())
        .generator(generator)
        .scheduler(scheduler.handle())
        .build();

    let generation = tokio::spawn(textbox.trigger_generation());
    assert_eq!(scheduler.frame_callback_count(), 1);

    drop(textbox);
    assert_eq!(scheduler.frame_callback_count(), 0);

    gate.notify_one();
    generation.await.unwrap();
    assert_eq!(name.get(), "late text");
    assert_eq!(scheduler.frame_callback_count(), 0);
}

#[tokio::test]
async fn test_change_handler_may_reenter_widget() {
    let name = SharedValue::new("");
    let textbox: Arc<Mutex<Option<Arc<AiTextbox>>>> = Arc::new(Mutex::new(None));
    let observed = Arc::new(Mutex::new(Vec::new()));

    let cell = name.clone();
    let widget = textbox.clone();
    let log = observed.clone();
    let binding = ValueBinding::new(
        {
            let cell = cell.clone();
            move || cell.get()
        },
        move |event| {
            cell.set(event.value());
            if let Some(textbox) = widget.lock().unwrap().as_ref() {
                log.lock().unwrap().push(textbox.is_busy());
            }
        },
    );

    let built = Arc::new(
        ai_textbox(binding)
            .generator(Generator::new(|| async { Ok(Some("generated".to_string())) }))
            .build(),
    );
    *textbox.lock().unwrap() = Some(built.clone());

    built.trigger_generation().await;
    assert_eq!(name.get(), "generated");
    // The handler ran after the widget released its lock and left busy
    assert_eq!(*observed.lock().unwrap(), vec![false]);

    textbox.lock().unwrap().take();
}

#[tokio::test]
async fn test_generator_may_read_its_widget() {
    let name = SharedValue::new("draft");
    let textbox = Arc::new(ai_textbox(name.binding()).build());

    let weak = Arc::downgrade(&textbox);
    textbox.set_generator(Some(Generator::new(move || {
        // Runs synchronously inside trigger_generation
        let current = weak.upgrade().map(|textbox| textbox.value()).unwrap_or_default();
        async move { Ok(Some(format!("{current}!"))) }
    })));

    textbox.trigger_generation().await;
    assert_eq!(name.get(), "draft!");
    assert!(!textbox.is_busy());
    assert_eq!(textbox.undo_value().as_deref(), Some("draft"));
}

#[tokio::test]
async fn test_panicking_generator_leaves_widget_idle() {
    let scheduler = FrameScheduler::new();
    let name = SharedValue::new("draft");
    let textbox = ai_textbox(name.binding())
        .generator(Generator::new(
            || -> std::future::Ready<Result<Option<String>, GenerationError>> {
                panic!("generator exploded")
            },
        ))
        .scheduler(scheduler.handle())
        .build();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = textbox.trigger_generation();
    }));
    assert!(outcome.is_err());

    assert!(!textbox.is_busy());
    assert!(!textbox.is_accented());
    assert_eq!(textbox.accent_angle(), 0);
    assert_eq!(scheduler.frame_callback_count(), 0);
    assert!(textbox.has_undo());
    assert_eq!(name.get(), "draft");

    // The widget accepts a new request afterwards
    textbox.set_generator(Some(Generator::new(|| async { Ok(Some("again".to_string())) })));
    textbox.trigger_generation().await;
    assert_eq!(name.get(), "again");
}
