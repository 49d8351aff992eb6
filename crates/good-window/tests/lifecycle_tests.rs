//! Lifecycle tests: state transitions, close handling, focus, theme and
//! monitor changes.

mod common;

use std::sync::Arc;

use parking_lot::Mutex;

use common::Fixture;
use good_window::client::FocusId;
use good_window::native::{HeadlessWindow, NativeTopLevelWindow};
use good_window::theme::ColorScheme;
use good_window::{
    ChromeConfig, ClientEvent, PlatformMessage, Point, Rect, Screen, ScreenId, Size,
    StateChangeEvent, WindowState,
};

fn record_states(fixture: &Fixture) -> Arc<Mutex<Vec<StateChangeEvent>>> {
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    fixture
        .window
        .state_changed()
        .connect(move |event| sink.lock().push(*event));
    states
}

#[test]
fn test_new_window_is_hidden_and_normal() {
    let fixture = Fixture::new();
    assert_eq!(fixture.window.window_state(), WindowState::NoState);
    assert!(!fixture.window.is_visible());
    assert!(!fixture.window.is_active_window());
    assert_eq!(fixture.window.title(), "Fixture");
    assert_eq!(fixture.native.state().title, "Fixture");
}

#[test]
fn test_state_transitions_are_reported_once() {
    let fixture = Fixture::new();
    let states = record_states(&fixture);
    fixture.window.show();

    fixture.window.show_maximized();
    fixture.window.show_maximized();
    fixture.window.show_minimized();
    fixture.window.show_normal();

    assert_eq!(
        *states.lock(),
        vec![
            StateChangeEvent {
                old: WindowState::NoState,
                new: WindowState::Maximized
            },
            StateChangeEvent {
                old: WindowState::Maximized,
                new: WindowState::Minimized
            },
            StateChangeEvent {
                old: WindowState::Minimized,
                new: WindowState::NoState
            },
        ]
    );
    assert_eq!(fixture.window.frame_geometry(), Rect::new(100, 100, 800, 600));
}

#[test]
fn test_full_screen_and_back() {
    let fixture = Fixture::new();
    fixture.window.show_full_screen();
    assert!(fixture.window.is_full_screen());
    assert!(fixture.window.is_visible());
    assert_eq!(fixture.window.frame_geometry(), Rect::new(0, 0, 1920, 1080));

    fixture.window.show_maximized();
    assert!(fixture.window.is_maximized());
    assert_eq!(fixture.window.frame_geometry(), Rect::new(0, 0, 1920, 1040));

    fixture.window.show_normal();
    assert_eq!(fixture.window.window_state(), WindowState::NoState);
    assert_eq!(fixture.window.frame_geometry(), Rect::new(100, 100, 800, 600));
}

#[test]
fn test_client_sees_show_state_and_hide() {
    let fixture = Fixture::new();
    fixture.window.show();
    fixture.window.show_maximized();
    fixture.window.hide();

    let events = fixture.client.take_events();
    assert_eq!(events.first(), Some(&ClientEvent::Show));
    assert!(events.contains(&ClientEvent::WindowStateChange {
        old: WindowState::NoState,
        new: WindowState::Maximized,
    }));
    assert_eq!(events.last(), Some(&ClientEvent::Hide));
}

#[test]
fn test_close_accepted() {
    let fixture = Fixture::new();
    let states = record_states(&fixture);
    let accepted = Arc::new(Mutex::new(0));
    let count = accepted.clone();
    fixture
        .window
        .close_accepted()
        .connect(move |_| *count.lock() += 1);

    fixture.window.show();
    assert!(fixture.window.close());

    assert!(fixture.window.is_closed());
    assert!(!fixture.native.is_visible());
    assert_eq!(*accepted.lock(), 1);
    assert_eq!(
        states.lock().last(),
        Some(&StateChangeEvent {
            old: WindowState::NoState,
            new: WindowState::Closed
        })
    );
    assert!(fixture.overlay.lock().destroyed);
    assert_eq!(fixture.dispatcher.active_timers(), 0);
    assert_eq!(fixture.dispatcher.pending_tasks(), 0);
    // The native window survives unless delete-on-close is set.
    assert!(!fixture.native.state().destroyed);
}

#[test]
fn test_close_vetoed_by_client() {
    let fixture = Fixture::new();
    fixture.window.show();
    fixture.client.set_veto(true);

    assert!(!fixture.window.close());
    assert!(!fixture.window.is_closed());
    assert!(fixture.native.is_visible());
    assert!(!fixture.overlay.lock().destroyed);

    fixture.client.set_veto(false);
    assert!(fixture.window.close());
    assert_eq!(*fixture.client.close_requests.lock(), 2);
}

#[test]
fn test_delete_on_close_destroys_native() {
    let fixture = Fixture::with(
        ChromeConfig::new().with_delete_on_close(true),
        HeadlessWindow::new(Rect::new(100, 100, 800, 600)),
    );
    let destroyed = Arc::new(Mutex::new(0));
    let count = destroyed.clone();
    fixture
        .window
        .destroyed()
        .connect(move |_| *count.lock() += 1);

    fixture.window.show();
    fixture.window.close();
    assert!(fixture.native.state().destroyed);
    assert_eq!(*destroyed.lock(), 1);
}

#[test]
fn test_close_is_final() {
    let fixture = Fixture::new();
    fixture.window.show();
    fixture.window.close();

    fixture.window.show_normal();
    fixture.window.show_maximized();
    fixture.window.set_title("After");
    fixture.settle();
    assert!(fixture.window.is_closed());
    assert_eq!(fixture.window.title(), "Fixture");
    assert_eq!(
        fixture.window.handle_message(PlatformMessage::Activated(true)),
        good_window::MessageResult::Ignored
    );
}

#[test]
fn test_focus_restored_after_reactivation() {
    let fixture = Fixture::new();
    *fixture.client.focusable.lock() = vec![FocusId(1), FocusId(2)];
    *fixture.client.focused.lock() = Some(FocusId(2));
    fixture.window.show();

    fixture.window.handle_message(PlatformMessage::Activated(true));
    fixture.window.handle_message(PlatformMessage::Activated(false));
    *fixture.client.focused.lock() = None;

    fixture.window.handle_message(PlatformMessage::Activated(true));
    assert_eq!(*fixture.client.focused.lock(), None);
    fixture.settle();
    assert_eq!(*fixture.client.focused.lock(), Some(FocusId(2)));
}

#[test]
fn test_focus_falls_back_to_first_focusable() {
    let fixture = Fixture::new();
    *fixture.client.focusable.lock() = vec![FocusId(7)];
    *fixture.client.focused.lock() = Some(FocusId(3));
    fixture.window.show();

    fixture.window.handle_message(PlatformMessage::Activated(true));
    fixture.window.handle_message(PlatformMessage::Activated(false));
    fixture.window.handle_message(PlatformMessage::Activated(true));
    fixture.settle();
    assert_eq!(*fixture.client.focused.lock(), Some(FocusId(7)));
}

#[test]
fn test_deactivation_cancels_pending_focus_restore() {
    let fixture = Fixture::new();
    *fixture.client.focusable.lock() = vec![FocusId(1), FocusId(2)];
    fixture.window.show();

    fixture.window.handle_message(PlatformMessage::Activated(true));
    *fixture.client.focused.lock() = Some(FocusId(2));
    fixture.window.handle_message(PlatformMessage::Activated(false));
    *fixture.client.focused.lock() = None;
    fixture.settle();
    assert_eq!(*fixture.client.focused.lock(), None);

    *fixture.client.focused.lock() = Some(FocusId(2));
    for _ in 0..3 {
        fixture.window.handle_message(PlatformMessage::Activated(true));
        fixture.window.handle_message(PlatformMessage::Activated(false));
    }
    fixture.window.handle_message(PlatformMessage::Activated(true));
    *fixture.client.focused.lock() = None;
    fixture.settle();
    assert_eq!(*fixture.client.focused.lock(), Some(FocusId(2)));
}

#[test]
fn test_activation_changes_are_deduplicated() {
    let fixture = Fixture::new();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    fixture
        .window
        .activation_changed()
        .connect(move |active| sink.lock().push(*active));

    fixture.window.handle_message(PlatformMessage::Activated(true));
    fixture.window.handle_message(PlatformMessage::Activated(true));
    fixture.window.handle_message(PlatformMessage::Activated(false));
    assert_eq!(*changes.lock(), vec![true, false]);
    assert!(!fixture.window.is_active_window());
}

#[test]
fn test_theme_change_emitted_only_on_change() {
    let fixture = Fixture::new();
    let themes = Arc::new(Mutex::new(Vec::new()));
    let sink = themes.clone();
    fixture
        .window
        .theme_changed()
        .connect(move |event| sink.lock().push(*event));

    fixture.window.handle_message(PlatformMessage::ThemeChanged);
    assert!(themes.lock().is_empty());

    fixture.theme_source.set(ColorScheme::Dark);
    fixture.window.handle_message(PlatformMessage::ThemeChanged);
    fixture.window.handle_message(PlatformMessage::ThemeChanged);
    assert_eq!(themes.lock().len(), 1);
    assert!(themes.lock()[0].is_dark);
    assert!(fixture.window.is_dark_theme());

    fixture.native.set_borders_drawn_by_system(true);
    fixture.window.handle_message(PlatformMessage::CompositionChanged);
    assert_eq!(themes.lock().len(), 2);
    assert!(themes.lock()[1].borders_drawn_by_system);
    assert!(fixture.window.borders_drawn_by_system());
}

#[test]
fn test_scale_factor_change_updates_ratio() {
    let fixture = Fixture::new();
    fixture.native.set_scale_factor(1.5);
    fixture
        .window
        .handle_message(PlatformMessage::ScaleFactorChanged(1.5));
    assert_eq!(fixture.window.pixel_ratio().get(), 1.5);
    assert!(
        fixture
            .client
            .take_events()
            .contains(&ClientEvent::ScaleChange(1.5))
    );
}

#[test]
fn test_scale_factor_change_recomputes_theme_flags() {
    let fixture = Fixture::new();
    let themes = Arc::new(Mutex::new(Vec::new()));
    let sink = themes.clone();
    fixture
        .window
        .theme_changed()
        .connect(move |event| sink.lock().push(*event));

    fixture.native.set_borders_drawn_by_system(true);
    fixture.native.set_scale_factor(1.5);
    fixture
        .window
        .handle_message(PlatformMessage::ScaleFactorChanged(1.5));
    fixture.settle();

    assert!(fixture.window.borders_drawn_by_system());
    assert_eq!(themes.lock().len(), 1);
    assert!(themes.lock()[0].borders_drawn_by_system);
    assert!(!themes.lock()[0].is_dark);
}

#[test]
fn test_monitor_change_rescales_and_reanchors() {
    let screens = vec![
        Screen::new(
            ScreenId::new(1),
            "Primary",
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 0, 1920, 1040),
            1.0,
            true,
        ),
        Screen::new(
            ScreenId::new(2),
            "Secondary",
            Rect::new(1920, 0, 2560, 1440),
            Rect::new(1920, 0, 2560, 1400),
            2.0,
            false,
        ),
    ];
    let fixture = Fixture::with(
        ChromeConfig::default(),
        HeadlessWindow::new(Rect::new(100, 100, 800, 600)).with_screens(screens),
    );
    fixture.window.show();

    fixture.native.move_frame(Rect::new(4200, 1200, 800, 600));
    fixture
        .window
        .handle_message(PlatformMessage::Moved(Point::new(4200, 1200)));

    assert_eq!(fixture.window.pixel_ratio().get(), 2.0);
    // Logical size kept (doubled in physical pixels), center pulled back
    // inside the work area minus a 20 logical px margin.
    assert_eq!(
        fixture.window.frame_geometry(),
        Rect::new(3639, 759, 1600, 1200)
    );
    assert_eq!(fixture.window.screen().map(|s| s.id()), Some(ScreenId::new(2)));
}

#[test]
fn test_moving_within_a_monitor_keeps_geometry() {
    let fixture = Fixture::new();
    fixture.window.show();
    fixture.native.move_frame(Rect::new(300, 200, 800, 600));
    fixture
        .window
        .handle_message(PlatformMessage::Moved(Point::new(300, 200)));
    assert_eq!(fixture.window.frame_geometry(), Rect::new(300, 200, 800, 600));
    assert_eq!(fixture.window.normal_geometry(), Rect::new(300, 200, 800, 600));
    assert!(
        fixture
            .client
            .take_events()
            .contains(&ClientEvent::Move(Point::new(300, 200)))
    );
}

#[test]
fn test_size_limits() {
    let fixture = Fixture::new();
    fixture.window.set_min_size(Some(Size::new(400, 300)));
    fixture.window.resize(Size::new(100, 100));
    assert_eq!(fixture.window.size(), Size::new(400, 300));

    fixture.window.set_max_size(Some(Size::new(400, 500)));
    assert!(fixture.window.fixed_size().width);
    assert!(!fixture.window.fixed_size().height);

    fixture.window.show_maximized();
    assert_eq!(fixture.window.window_state(), WindowState::NoState);
}

#[test]
fn test_dropping_window_destroys_native() {
    let fixture = Fixture::new();
    let Fixture { window, native, .. } = fixture;
    drop(window);
    assert!(native.state().destroyed);
}
