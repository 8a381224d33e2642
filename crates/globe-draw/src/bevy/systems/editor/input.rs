//! Pointer input: picking, grabbing, dragging and releasing draggers.

use bevy::input::ButtonInput;
use bevy::math::DVec3;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::bevy::components::Dragger;
use crate::bevy::events::{DraggerMoved, MoveDragger, PointerInput, PointerKind};
use crate::bevy::resources::{CameraNavigation, Globe, GlobeViewer, InputController};
use crate::config::{EditorConfig, KeyModifier};
use crate::ellipsoid::{BoundingSphere, Ellipsoid, TangentPlane};
use crate::shape::GlobePosition;
use crate::view::GlobeView;

/// Result of a scene pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picked {
    Dragger(Entity),
    Entity(Entity),
}

/// Picks the entity under `screen`.
///
/// Draggers win over ordinary entities. Within each group the candidate
/// nearest on screen is returned, and candidates behind the globe are
/// skipped.
pub fn pick(
    view: &dyn GlobeView,
    ellipsoid: &Ellipsoid,
    config: &EditorConfig,
    screen: Vec2,
    draggers: impl IntoIterator<Item = (Entity, DVec3, f32)>,
    entities: impl IntoIterator<Item = (Entity, DVec3)>,
) -> Option<Picked> {
    let marker_radius = config.marker_size_px * 0.5;
    let tolerance = config.pick_tolerance_px;

    let dragger_hits = draggers.into_iter().map(|(entity, position, scale)| {
        (entity, position, (marker_radius * scale).max(tolerance))
    });
    if let Some(dragger) = nearest_on_screen(view, ellipsoid, screen, dragger_hits) {
        return Some(Picked::Dragger(dragger));
    }

    let entity_hits = entities
        .into_iter()
        .map(|(entity, position)| (entity, position, tolerance));
    nearest_on_screen(view, ellipsoid, screen, entity_hits).map(Picked::Entity)
}

fn nearest_on_screen(
    view: &dyn GlobeView,
    ellipsoid: &Ellipsoid,
    screen: Vec2,
    candidates: impl Iterator<Item = (Entity, DVec3, f32)>,
) -> Option<Entity> {
    candidates
        .filter(|(_, position, _)| view.is_point_visible(*position, ellipsoid))
        .filter_map(|(entity, position, radius)| {
            let distance = view.world_to_screen(position)?.distance(screen);
            (distance <= radius).then_some((entity, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}

/// Moves `position` along its local up axis by a screen-space vertical delta.
///
/// Pointer motion towards the top of the screen (negative delta) raises it.
pub fn vertical_offset(
    view: &dyn GlobeView,
    ellipsoid: &Ellipsoid,
    position: DVec3,
    pixel_delta: f32,
) -> Option<DVec3> {
    let meters_per_pixel = view.pixel_size(
        BoundingSphere::new(position, 1.0),
        view.drawing_buffer_size(),
    );
    let plane = TangentPlane::new(ellipsoid, position)?;
    Some(position + plane.z_axis * (-f64::from(pixel_delta) * meters_per_pixel))
}

type DraggerQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static mut Dragger, &'static mut GlobePosition)>;

/// System driving the grab/drag/release state machine.
#[allow(clippy::too_many_arguments)]
pub fn process_pointer_input(
    mut pointer: MessageReader<PointerInput>,
    mut requests: MessageReader<MoveDragger>,
    mut moved: MessageWriter<DraggerMoved>,
    mut controller: ResMut<InputController>,
    mut navigation: ResMut<CameraNavigation>,
    config: Res<EditorConfig>,
    globe: Res<Globe>,
    viewer: Res<GlobeViewer>,
    mut draggers: DraggerQuery,
    others: Query<(Entity, &GlobePosition), Without<Dragger>>,
) {
    for request in requests.read() {
        if let Ok((_, _, mut position)) = draggers.get_mut(request.dragger) {
            position.0 = request.position;
            moved.write(DraggerMoved {
                dragger: request.dragger,
                position: request.position,
            });
        } else {
            tracing::debug!("[input] move request for missing dragger {}", request.dragger);
        }
    }

    for input in pointer.read() {
        if input.modifier.is_some_and(|modifier| modifier != config.drag_modifier) {
            continue;
        }

        match input.kind {
            PointerKind::Down => {
                let Some(view) = viewer.view() else {
                    continue;
                };
                let picked = pick(
                    view,
                    &globe.0,
                    &config,
                    input.position,
                    draggers
                        .iter()
                        .map(|(entity, dragger, position)| (entity, position.0, dragger.scale)),
                    others.iter().map(|(entity, position)| (entity, position.0)),
                );

                match picked {
                    Some(Picked::Dragger(entity)) => {
                        release(&mut controller, &mut navigation, &mut draggers, config.idle_scale);
                        if let Ok((_, mut dragger, _)) = draggers.get_mut(entity) {
                            dragger.scale = config.grab_scale;
                        }
                        controller.grab(entity);
                        navigation.set_enabled(false);
                        tracing::debug!("[input] grabbed dragger {}", entity);
                    }
                    Some(Picked::Entity(entity)) => {
                        tracing::debug!("[input] picked {}, not a dragger", entity);
                    }
                    None => {}
                }
            }
            PointerKind::Up => {
                release(&mut controller, &mut navigation, &mut draggers, config.idle_scale);
            }
            PointerKind::Move => {
                let Some(grabbed) = controller.grabbed() else {
                    continue;
                };
                let Ok((_, dragger, mut position)) = draggers.get_mut(grabbed) else {
                    tracing::warn!("[input] grabbed dragger {} no longer exists", grabbed);
                    controller.release();
                    navigation.set_enabled(true);
                    continue;
                };
                if !dragger.axis_mode.accepts(input.modifier, config.drag_modifier) {
                    continue;
                }
                let Some(view) = viewer.view() else {
                    continue;
                };

                let target = if dragger.axis_mode.is_vertical() {
                    vertical_offset(view, &globe.0, position.0, input.position.y - input.previous.y)
                } else {
                    view.pick_ellipsoid(input.position, &globe.0)
                };

                if let Some(target) = target {
                    position.0 = target;
                    moved.write(DraggerMoved {
                        dragger: grabbed,
                        position: target,
                    });
                }
            }
            PointerKind::Click | PointerKind::DoubleClick => {}
        }
    }
}

/// Releases the grabbed dragger, if any. A no-op while idle.
fn release(
    controller: &mut InputController,
    navigation: &mut CameraNavigation,
    draggers: &mut DraggerQuery,
    idle_scale: f32,
) {
    let Some(entity) = controller.release() else {
        return;
    };
    if let Ok((_, mut dragger, _)) = draggers.get_mut(entity) {
        dragger.scale = idle_scale;
    }
    navigation.set_enabled(true);
    tracing::debug!("[input] released dragger {}", entity);
}

/// Click tracking for `collect_pointer_input`.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last_cursor: Option<Vec2>,
    press_origin: Option<Vec2>,
    last_click_secs: Option<f64>,
}

fn held_modifier(keys: &ButtonInput<KeyCode>) -> Option<KeyModifier> {
    if keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
        Some(KeyModifier::Ctrl)
    } else if keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        Some(KeyModifier::Shift)
    } else if keys.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]) {
        Some(KeyModifier::Alt)
    } else {
        None
    }
}

/// System translating window mouse state into `PointerInput` messages.
pub fn collect_pointer_input(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time<Real>>,
    config: Res<EditorConfig>,
    mut tracker: Local<PointerTracker>,
    mut pointer: MessageWriter<PointerInput>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let modifier = held_modifier(&keys);

    let Some(cursor) = window.cursor_position() else {
        // A release outside the window still ends the gesture.
        if buttons.just_released(MouseButton::Left) {
            let position = tracker.last_cursor.or(tracker.press_origin).unwrap_or_default();
            tracker.press_origin = None;
            pointer.write(PointerInput {
                kind: PointerKind::Up,
                position,
                previous: position,
                modifier,
            });
        }
        tracker.last_cursor = None;
        return;
    };

    let event = |kind: PointerKind, previous: Vec2| PointerInput {
        kind,
        position: cursor,
        previous,
        modifier,
    };

    let previous = tracker.last_cursor.unwrap_or(cursor);
    if previous != cursor {
        pointer.write(event(PointerKind::Move, previous));
    }

    if buttons.just_pressed(MouseButton::Left) {
        tracker.press_origin = Some(cursor);
        pointer.write(event(PointerKind::Down, cursor));
    }

    if buttons.just_released(MouseButton::Left) {
        pointer.write(event(PointerKind::Up, cursor));

        let is_click = tracker
            .press_origin
            .take()
            .is_some_and(|origin| origin.distance(cursor) <= config.click_slop_px);
        if is_click {
            pointer.write(event(PointerKind::Click, cursor));

            let now = time.elapsed_secs_f64();
            let is_double = tracker
                .last_click_secs
                .is_some_and(|last| now - last <= f64::from(config.double_click_secs));
            if is_double {
                pointer.write(event(PointerKind::DoubleClick, cursor));
                tracker.last_click_secs = None;
            } else {
                tracker.last_click_secs = Some(now);
            }
        }
    }

    tracker.last_cursor = Some(cursor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bevy::resources::DragState;
    use crate::bevy::systems::editor::{
        DraggerOptions, GeometryEditor, create_dragger, start_editing, stop_editing,
    };
    use crate::bevy::test_utils::TestApp;
    use crate::config::DragAxisMode;
    use crate::shape::GlobeShape;

    fn polyline_app() -> (TestApp, Entity, Vec<Entity>) {
        let mut app = TestApp::new();
        let entity = app.spawn_shape(GlobeShape::polyline(vec![
            TestApp::ground(-0.01, 0.0),
            TestApp::ground(0.0, 0.005),
            TestApp::ground(0.01, 0.0),
        ]));
        start_editing(app.world_mut(), entity).unwrap();
        app.update();
        let Some(GeometryEditor::Vertices { draggers }) = app.editor(entity) else {
            panic!("expected vertex editor");
        };
        (app, entity, draggers)
    }

    fn grab(app: &mut TestApp, dragger: Entity) -> Vec2 {
        let screen = TestApp::screen_of(app.position(dragger));
        app.pointer(PointerInput::new(PointerKind::Down, screen));
        screen
    }

    #[test]
    fn test_release_when_idle_changes_nothing() {
        let (mut app, entity, _) = polyline_app();
        let before = app.vertices(entity);

        app.pointer(PointerInput::new(PointerKind::Up, Vec2::new(400.0, 300.0)));

        assert_eq!(app.world().resource::<InputController>().state(), DragState::Idle);
        assert!(app.world().resource::<CameraNavigation>().is_enabled());
        assert_eq!(app.vertices(entity), before);
        assert!(app.recorded().moved.is_empty());
    }

    #[test]
    fn test_select_move_release() {
        let (mut app, entity, draggers) = polyline_app();
        let dragger = draggers[1];

        let start = grab(&mut app, dragger);
        assert_eq!(app.world().resource::<InputController>().grabbed(), Some(dragger));
        assert!((app.dragger(dragger).scale - 1.2).abs() < f32::EPSILON);
        let navigation = *app.world().resource::<CameraNavigation>();
        assert!(
            !navigation.enable_rotate && !navigation.enable_tilt && !navigation.enable_translate
        );

        let target = TestApp::ground(0.0, -0.005);
        let end = TestApp::screen_of(target);
        app.pointer(PointerInput::moved(start, end));

        assert!(app.position(dragger).distance(target) < 1.0);
        assert_eq!(app.vertices(entity)[1], app.position(dragger));
        assert_eq!(app.recorded().moved.len(), 1);
        assert_eq!(app.recorded().moved[0].dragger, dragger);

        app.pointer(PointerInput::new(PointerKind::Up, end));
        assert!(app.world().resource::<InputController>().is_idle());
        assert!((app.dragger(dragger).scale - 1.0).abs() < f32::EPSILON);
        assert!(app.world().resource::<CameraNavigation>().is_enabled());
    }

    #[test]
    fn test_pointer_scenario_moves_only_grabbed_vertex() {
        let (mut app, entity, draggers) = polyline_app();
        let before = app.vertices(entity);

        let start = grab(&mut app, draggers[1]);
        let end = TestApp::screen_of(TestApp::ground(0.0, -0.005));
        app.pointer(PointerInput::moved(start, end));
        app.pointer(PointerInput::new(PointerKind::Up, end));

        let after = app.vertices(entity);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert!(after[1].distance(TestApp::ground(0.0, -0.005)) < 1.0);

        stop_editing(app.world_mut(), entity).unwrap();
        app.update();
        assert_eq!(app.vertices(entity), after);
        assert_eq!(app.dragger_count(), 0);
    }

    #[test]
    fn test_missed_pick_stays_idle() {
        let (mut app, _, _) = polyline_app();
        app.pointer(PointerInput::new(PointerKind::Down, Vec2::new(5.0, 5.0)));

        assert!(app.world().resource::<InputController>().is_idle());
        assert!(app.world().resource::<CameraNavigation>().is_enabled());
    }

    #[test]
    fn test_horizontal_ignores_designated_modifier() {
        let (mut app, entity, draggers) = polyline_app();
        let before = app.vertices(entity);

        let start = grab(&mut app, draggers[0]);
        let end = start + Vec2::new(0.0, 40.0);
        app.pointer(PointerInput::moved(start, end).with_modifier(KeyModifier::Ctrl));

        assert_eq!(app.vertices(entity), before);
        assert!(app.recorded().moved.is_empty());
    }

    #[test]
    fn test_other_modifiers_are_ignored() {
        let (mut app, _, draggers) = polyline_app();
        let screen = TestApp::screen_of(app.position(draggers[0]));

        app.pointer(PointerInput::new(PointerKind::Down, screen).with_modifier(KeyModifier::Shift));
        assert!(app.world().resource::<InputController>().is_idle());

        app.pointer(PointerInput::new(PointerKind::Down, screen).with_modifier(KeyModifier::Ctrl));
        assert_eq!(app.world().resource::<InputController>().grabbed(), Some(draggers[0]));
    }

    #[test]
    fn test_vertical_drag_raises_extrusion() {
        let mut app = TestApp::new();
        let entity = app.spawn_shape(GlobeShape::extruded_polygon(
            vec![
                TestApp::ground(-0.01, -0.01),
                TestApp::ground(0.01, -0.01),
                TestApp::ground(0.0, 0.01),
            ],
            100.0,
        ));
        start_editing(app.world_mut(), entity).unwrap();
        app.update();
        let Some(GeometryEditor::ExtrudedPolygon { height, .. }) = app.editor(entity) else {
            panic!("expected extruded editor");
        };

        let start = grab(&mut app, height[0]);
        assert_eq!(app.world().resource::<InputController>().grabbed(), Some(height[0]));

        // Ten pixels towards the top of the screen.
        app.pointer(PointerInput::moved(start, start - Vec2::new(0.0, 10.0)));

        let raised = app.shape(entity).extruded_height().unwrap();
        assert!(raised > 250.0, "extrusion only reached {raised}");
        assert!(raised < 350.0, "extrusion overshot to {raised}");
    }

    #[test]
    fn test_vertical_constrained_needs_modifier() {
        let mut app = TestApp::new();
        let ground = TestApp::ground(0.0, 0.0);
        let dragger = create_dragger(
            app.world_mut(),
            DraggerOptions::at(ground).axis_mode(DragAxisMode::VerticalConstrained),
        );
        app.update();

        let start = grab(&mut app, dragger);
        let end = start - Vec2::new(0.0, 5.0);

        app.pointer(PointerInput::moved(start, end));
        assert_eq!(app.position(dragger), ground);

        app.pointer(PointerInput::moved(start, end).with_modifier(KeyModifier::Ctrl));
        assert!(app.position(dragger).length() > ground.length());
        assert_eq!(app.recorded().moved.len(), 1);
    }

    #[test]
    fn test_stop_during_drag_clears_grab() {
        let (mut app, entity, draggers) = polyline_app();
        let start = grab(&mut app, draggers[2]);

        stop_editing(app.world_mut(), entity).unwrap();
        assert!(app.world().resource::<InputController>().is_idle());
        assert!(app.world().resource::<CameraNavigation>().is_enabled());

        app.pointer(PointerInput::moved(start, start + Vec2::new(30.0, 0.0)));
        app.pointer(PointerInput::new(PointerKind::Up, start));
        assert!(app.recorded().moved.is_empty());
    }

    #[test]
    fn test_despawned_grab_resets_on_move() {
        let (mut app, _, draggers) = polyline_app();
        let start = grab(&mut app, draggers[0]);

        app.world_mut().despawn(draggers[0]);
        app.pointer(PointerInput::moved(start, start + Vec2::new(30.0, 0.0)));

        assert!(app.world().resource::<InputController>().is_idle());
        assert!(app.world().resource::<CameraNavigation>().is_enabled());
        assert!(app.recorded().moved.is_empty());
    }

    #[test]
    fn test_down_on_second_dragger_releases_first() {
        let (mut app, _, draggers) = polyline_app();
        grab(&mut app, draggers[0]);
        grab(&mut app, draggers[2]);

        assert_eq!(app.world().resource::<InputController>().grabbed(), Some(draggers[2]));
        assert!((app.dragger(draggers[0]).scale - 1.0).abs() < f32::EPSILON);
        assert!((app.dragger(draggers[2]).scale - 1.2).abs() < f32::EPSILON);
    }

    /// Adds a primary window and the window adapter to a headless app.
    fn attach_window(app: &mut TestApp) -> Entity {
        app.app.init_resource::<ButtonInput<MouseButton>>();
        app.app.init_resource::<ButtonInput<KeyCode>>();
        app.app.add_systems(Update, collect_pointer_input.before(process_pointer_input));
        app.world_mut().resource_mut::<EditorConfig>().double_click_secs = 10.0;
        app.world_mut().spawn((Window::default(), PrimaryWindow)).id()
    }

    /// Runs one frame with the cursor at `cursor` after updating the buttons.
    fn mouse_frame(
        app: &mut TestApp,
        window: Entity,
        cursor: Option<Vec2>,
        buttons: impl FnOnce(&mut ButtonInput<MouseButton>),
    ) {
        {
            let mut input = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
            input.clear();
            buttons(&mut *input);
        }
        if let Some(mut window) = app.world_mut().get_mut::<Window>(window) {
            window.set_cursor_position(cursor);
        }
        app.update();
    }

    fn hold(_: &mut ButtonInput<MouseButton>) {}

    fn press_left(buttons: &mut ButtonInput<MouseButton>) {
        buttons.press(MouseButton::Left);
    }

    fn release_left(buttons: &mut ButtonInput<MouseButton>) {
        buttons.release(MouseButton::Left);
    }

    fn click_at(app: &mut TestApp, window: Entity, at: Vec2) {
        mouse_frame(app, window, Some(at), press_left);
        mouse_frame(app, window, Some(at), release_left);
    }

    fn count(app: &TestApp, kind: PointerKind) -> usize {
        app.recorded()
            .pointer
            .iter()
            .filter(|input| input.kind == kind)
            .count()
    }

    #[test]
    fn test_release_outside_window_ends_drag() {
        let (mut app, _, draggers) = polyline_app();
        let window = attach_window(&mut app);
        let screen = TestApp::screen_of(app.position(draggers[1]));

        mouse_frame(&mut app, window, Some(screen), hold);
        mouse_frame(&mut app, window, Some(screen), press_left);
        assert_eq!(app.world().resource::<InputController>().grabbed(), Some(draggers[1]));

        mouse_frame(&mut app, window, None, release_left);
        assert!(app.world().resource::<InputController>().is_idle());
        assert!(app.world().resource::<CameraNavigation>().is_enabled());
        assert!((app.dragger(draggers[1]).scale - 1.0).abs() < f32::EPSILON);

        let up: Vec<_> = app
            .recorded()
            .pointer
            .iter()
            .filter(|input| input.kind == PointerKind::Up)
            .copied()
            .collect();
        assert_eq!(up.len(), 1);
        assert_eq!(up[0].position, screen);

        mouse_frame(&mut app, window, Some(screen + Vec2::new(20.0, 0.0)), hold);
        assert!(app.recorded().moved.is_empty());
    }

    #[test]
    fn test_press_release_within_slop_is_click() {
        let mut app = TestApp::new();
        let window = attach_window(&mut app);
        let at = Vec2::new(400.0, 300.0);

        mouse_frame(&mut app, window, Some(at), hold);
        mouse_frame(&mut app, window, Some(at), press_left);
        mouse_frame(&mut app, window, Some(at + Vec2::new(2.0, 0.0)), release_left);

        assert_eq!(count(&app, PointerKind::Down), 1);
        assert_eq!(count(&app, PointerKind::Move), 1);
        assert_eq!(count(&app, PointerKind::Up), 1);
        assert_eq!(count(&app, PointerKind::Click), 1);
        assert_eq!(count(&app, PointerKind::DoubleClick), 0);
    }

    #[test]
    fn test_drag_beyond_slop_is_not_click() {
        let mut app = TestApp::new();
        let window = attach_window(&mut app);
        let at = Vec2::new(400.0, 300.0);

        mouse_frame(&mut app, window, Some(at), press_left);
        mouse_frame(&mut app, window, Some(at + Vec2::new(20.0, 0.0)), release_left);

        assert_eq!(count(&app, PointerKind::Up), 1);
        assert_eq!(count(&app, PointerKind::Click), 0);
    }

    #[test]
    fn test_two_quick_clicks_make_double_click() {
        let mut app = TestApp::new();
        let window = attach_window(&mut app);
        let at = Vec2::new(400.0, 300.0);

        click_at(&mut app, window, at);
        click_at(&mut app, window, at);

        assert_eq!(count(&app, PointerKind::Click), 2);
        assert_eq!(count(&app, PointerKind::DoubleClick), 1);
    }

    #[test]
    fn test_third_click_starts_new_pair() {
        let mut app = TestApp::new();
        let window = attach_window(&mut app);
        let at = Vec2::new(400.0, 300.0);

        for _ in 0..3 {
            click_at(&mut app, window, at);
        }

        assert_eq!(count(&app, PointerKind::Click), 3);
        assert_eq!(count(&app, PointerKind::DoubleClick), 1);
    }

    #[test]
    fn test_held_key_sets_modifier() {
        let mut app = TestApp::new();
        let window = attach_window(&mut app);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ControlLeft);

        mouse_frame(&mut app, window, Some(Vec2::new(400.0, 300.0)), press_left);

        let down = app.recorded().pointer.last().copied().unwrap();
        assert_eq!(down.kind, PointerKind::Down);
        assert_eq!(down.modifier, Some(KeyModifier::Ctrl));
    }

    #[test]
    fn test_pick_prefers_dragger_over_entity() {
        let config = EditorConfig::default();
        let view = TestApp::view();
        let ellipsoid = Ellipsoid::wgs84();
        let ground = TestApp::ground(0.0, 0.0);
        let screen = view.world_to_screen(ground).unwrap();

        let mut world = World::new();
        let dragger = world.spawn_empty().id();
        let entity = world.spawn_empty().id();

        let draggers = [(dragger, ground, 1.0)];
        let picked = pick(&view, &ellipsoid, &config, screen, draggers, [(entity, ground)]);
        assert_eq!(picked, Some(Picked::Dragger(dragger)));

        let no_draggers: Vec<(Entity, DVec3, f32)> = Vec::new();
        let picked = pick(&view, &ellipsoid, &config, screen, no_draggers, [(entity, ground)]);
        assert_eq!(picked, Some(Picked::Entity(entity)));

        let far = screen + Vec2::new(100.0, 0.0);
        let picked = pick(&view, &ellipsoid, &config, far, draggers, [(entity, ground)]);
        assert_eq!(picked, None);
    }
}
