use showcase_core::camera::CameraView;
use showcase_core::decor::PAINTS;
use showcase_core::state::{ShowcaseState, SystemStatus};

#[test]
fn warp_toggle_couples_auto_rotate_and_status() {
    let mut state = ShowcaseState::new();
    assert!(state.auto_rotate);
    assert_eq!(state.status(), SystemStatus::Online);

    assert!(state.toggle_warp());
    assert!(state.warping);
    assert!(!state.auto_rotate);
    assert_eq!(state.status(), SystemStatus::WarpEngaged);
    assert_eq!(state.status().label(), "WARP ENGAGED");

    assert!(!state.toggle_warp());
    assert!(!state.warping);
    assert!(state.auto_rotate);
    assert_eq!(state.status().label(), "ONLINE");
}

#[test]
fn status_colors_match_ui() {
    assert_eq!(SystemStatus::Online.color(), "#0f0");
    assert_eq!(SystemStatus::WarpEngaged.color(), "#ff0055");
}

#[test]
fn paint_selection_is_blocked_during_xray() {
    let mut state = ShowcaseState::new();
    assert!(state.select_paint(2));
    assert_eq!(state.paint_index, 2);

    state.toggle_xray();
    assert!(!state.select_paint(1));
    assert_eq!(state.paint_index, 2, "paint must not change under x-ray");

    state.toggle_xray();
    assert!(state.select_paint(1));
    assert_eq!(state.paint_index, 1);
}

#[test]
fn paint_selection_rejects_out_of_range() {
    let mut state = ShowcaseState::new();
    assert!(!state.select_paint(PAINTS.len()));
    assert_eq!(state.paint_index, 0);
}

#[test]
fn view_presets_stop_warp_and_auto_rotate() {
    let mut state = ShowcaseState::new();
    state.toggle_warp();
    assert!(state.warping);

    let goal = state.select_view(CameraView::Side);
    assert!(goal.is_some());
    assert!(!state.warping);
    assert!(!state.auto_rotate);

    let auto = state.select_view(CameraView::Auto);
    assert!(auto.is_none());
    assert!(state.auto_rotate);
}
