//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `GlobeDrawHeadlessPlugin` with a camera 10 km above
//! longitude 0, latitude 0, looking straight down. East is screen right and
//! north is screen up.

use bevy::ecs::message::{Message, Messages};
use bevy::math::{DVec3, UVec2};
use bevy::prelude::*;

use crate::bevy::components::Dragger;
use crate::bevy::events::{
    DraggerMoved, DrawingFinished, EditStarted, EditStopped, MoveDragger, PointerInput,
};
use crate::bevy::plugin::GlobeDrawHeadlessPlugin;
use crate::bevy::resources::{EditCommand, EditCommandQueue, GlobeViewer};
use crate::bevy::systems::editor::GeometryEditor;
use crate::ellipsoid::{Cartographic, Ellipsoid};
use crate::shape::{GlobePosition, GlobeShape};
use crate::view::{GlobeView, PerspectiveView};

pub(crate) const CAMERA_HEIGHT: f64 = 10_000.0;

/// Messages observed since the app was created.
#[derive(Resource, Default, Debug)]
pub(crate) struct Recorded {
    pub started: Vec<Entity>,
    pub stopped: Vec<Entity>,
    pub moved: Vec<DraggerMoved>,
    pub finished: Vec<Entity>,
    pub pointer: Vec<PointerInput>,
}

fn record_messages(
    mut recorded: ResMut<Recorded>,
    mut started: MessageReader<EditStarted>,
    mut stopped: MessageReader<EditStopped>,
    mut moved: MessageReader<DraggerMoved>,
    mut finished: MessageReader<DrawingFinished>,
    mut pointer: MessageReader<PointerInput>,
) {
    recorded.started.extend(started.read().map(|m| m.entity));
    recorded.stopped.extend(stopped.read().map(|m| m.entity));
    recorded.moved.extend(moved.read().copied());
    recorded.finished.extend(finished.read().map(|m| m.entity));
    recorded.pointer.extend(pointer.read().copied());
}

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(GlobeDrawHeadlessPlugin::default());
        app.insert_resource(GlobeViewer::new(Self::view()));
        app.init_resource::<Recorded>();
        app.add_systems(PostUpdate, record_messages);
        // Run one update to initialize all resources
        app.update();
        Self { app }
    }

    /// The camera used by every test app.
    pub fn view() -> PerspectiveView {
        let ellipsoid = Ellipsoid::wgs84();
        let target = ellipsoid.cartographic_to_cartesian(Cartographic::default());
        let eye = ellipsoid.cartographic_to_cartesian(Cartographic::new(0.0, 0.0, CAMERA_HEIGHT));
        PerspectiveView::look_at(eye, target, DVec3::Z, 60f64.to_radians(), UVec2::new(800, 600))
    }

    /// Ground point at the given degrees.
    pub fn ground(longitude: f64, latitude: f64) -> DVec3 {
        let cartographic = Cartographic::from_degrees(longitude, latitude, 0.0);
        Ellipsoid::wgs84().cartographic_to_cartesian(cartographic)
    }

    pub fn screen_of(point: DVec3) -> Vec2 {
        Self::view()
            .world_to_screen(point)
            .expect("point should be in front of the test camera")
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    pub fn spawn_shape(&mut self, shape: GlobeShape) -> Entity {
        self.world_mut().spawn(shape).id()
    }

    pub fn spawn_ellipse(&mut self, center: DVec3, radius: f64) -> Entity {
        self.world_mut()
            .spawn((GlobeShape::circle(radius), GlobePosition(center)))
            .id()
    }

    pub fn push_command(&mut self, command: EditCommand) {
        self.world().resource::<EditCommandQueue>().push(command);
    }

    /// Queue a message and run an update so systems consume it.
    pub fn send<M: Message>(&mut self, message: M) {
        self.world_mut().resource_mut::<Messages<M>>().write(message);
        self.update();
    }

    pub fn pointer(&mut self, input: PointerInput) {
        self.send(input);
    }

    pub fn move_dragger(&mut self, dragger: Entity, position: DVec3) {
        self.send(MoveDragger { dragger, position });
    }

    pub fn shape(&self, entity: Entity) -> GlobeShape {
        self.world().get::<GlobeShape>(entity).cloned().expect("entity should have a shape")
    }

    pub fn vertices(&self, entity: Entity) -> Vec<DVec3> {
        self.shape(entity)
            .positions()
            .map(|positions| positions.values.clone())
            .unwrap_or_default()
    }

    pub fn position(&self, entity: Entity) -> DVec3 {
        self.world().get::<GlobePosition>(entity).expect("entity should have a position").0
    }

    pub fn dragger(&self, entity: Entity) -> Dragger {
        self.world().get::<Dragger>(entity).cloned().expect("entity should be a dragger")
    }

    pub fn editor(&self, entity: Entity) -> Option<GeometryEditor> {
        self.world().get::<GeometryEditor>(entity).cloned()
    }

    pub fn dragger_count(&mut self) -> usize {
        let mut query = self.world_mut().query_filtered::<(), With<Dragger>>();
        query.iter(self.world()).count()
    }

    pub fn recorded(&self) -> &Recorded {
        self.world().resource::<Recorded>()
    }

    /// Get a reference to the World.
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
