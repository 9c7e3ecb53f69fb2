//! Broadcaster and debouncer driving parallax controllers.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use parallax_common::ParallaxSettings;
use parallax_core::{
    BindingOptions, Classification, ParallaxController, ParallaxEvent, Property, Segment,
    StaticLayout, StyleValue,
};
use parallax_scroll::{ResizeDebouncer, ScrollBroadcaster, ScrollSource};

#[derive(Default)]
struct Window {
    position: AtomicU64,
}

impl Window {
    fn scroll_to(&self, position: f64) {
        self.position.store(position.to_bits(), Ordering::SeqCst);
    }
}

impl ScrollSource for Window {
    fn scroll_position(&self) -> f64 {
        f64::from_bits(self.position.load(Ordering::SeqCst))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("parallax_scroll=trace")
        .with_test_writer()
        .try_init();
}

fn controller(layout: &mut StaticLayout, selector: &str, start: f64) -> ParallaxController {
    let element = layout.add_element(selector, 1000.0, 100.0);
    let segments = vec![Segment::new(start)
        .duration(100.0)
        .property(Property::new("opacity", 0.0, 1.0))];
    ParallaxController::new(element, segments, ParallaxSettings::default()).with_options(
        BindingOptions {
            animate_when_not_in_viewport: true,
            ..Default::default()
        },
    )
}

#[tokio::test(start_paused = true)]
async fn test_two_elements_share_one_broadcaster() {
    init_tracing();
    let window = Arc::new(Window::default());
    let settings = ParallaxSettings::default();
    let broadcaster = ScrollBroadcaster::from_settings(window.clone(), &settings).unwrap();

    let mut layout = StaticLayout::new(800.0, 3000.0);
    let mut first = controller(&mut layout, "#a", 100.0);
    let mut second = controller(&mut layout, "#b", 300.0);

    let mut first_sub = broadcaster.subscribe().unwrap();
    let mut second_sub = broadcaster.subscribe().unwrap();
    assert_eq!(broadcaster.subscriber_count(), 2);

    // Mount: both see the initial position.
    let position = first_sub.recv().await.unwrap().position;
    first.update(position, &layout);
    let position = second_sub.recv().await.unwrap().position;
    second.update(position, &layout);
    assert_eq!(first.classification(), Some(&Classification::Above));

    window.scroll_to(150.0);
    let position = first_sub.recv().await.unwrap().position;
    first.update(position, &layout);
    let position = second_sub.recv().await.unwrap().position;
    second.update(position, &layout);

    assert_eq!(first.snapshot().get("opacity"), Some(&StyleValue::Number(0.5)));
    assert_eq!(first.take_events(), vec![ParallaxEvent::Start]);
    assert_eq!(second.classification(), Some(&Classification::Above));
    assert!(second.take_events().is_empty());

    drop(first_sub);
    assert!(broadcaster.is_running());
    drop(second_sub);
    assert!(!broadcaster.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_resize_recomputes_once() {
    let updates = Arc::new(AtomicUsize::new(0));
    let mut layout = StaticLayout::new(800.0, 3000.0);
    let controller = Arc::new(Mutex::new(controller(&mut layout, "#a", 0.0)));
    let layout = Arc::new(Mutex::new(layout));

    let debouncer = {
        let updates = Arc::clone(&updates);
        let controller = Arc::clone(&controller);
        let layout = Arc::clone(&layout);
        ResizeDebouncer::from_settings(&ParallaxSettings::default(), move || {
            let layout = layout.lock().unwrap();
            controller.lock().unwrap().update(50.0, &*layout);
            updates.fetch_add(1, Ordering::SeqCst);
        })
    };

    for height in [700.0, 650.0, 600.0] {
        layout.lock().unwrap().viewport_height = height;
        debouncer.trigger().unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(updates.load(Ordering::SeqCst), 1);
    assert_eq!(
        controller.lock().unwrap().snapshot().get("opacity"),
        Some(&StyleValue::Number(0.5))
    );
}
