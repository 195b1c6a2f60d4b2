use bevy::app::AppExit;
use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::WindowCloseRequested;
use log::error;

use crate::configuration::config::ViewerConfig;
use crate::io::viewer::{BodyTag, Sprite as BodySprite, ViewFrame, Viewer};
use crate::simulation::run_loop::{LoopState, SimulationLoop};
use crate::simulation::states::NVec2;

#[derive(Component)]
struct BodyIndex(pub usize);

#[derive(Resource)]
struct ViewSettings {
    scale: f32, // world units -> pixels
    ticks_per_frame: u32,
}

/// Latest frame presented by the simulation loop, and the user's quit request.
/// This is the bevy side of the `Viewer` contract.
#[derive(Resource)]
pub struct FrameBuffer {
    pub sprites: Vec<BodySprite>,
    pub focus: NVec2,
    pub t: f64,
    pub quit: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            sprites: Vec::new(),
            focus: NVec2::zeros(),
            t: 0.0,
            quit: false,
        }
    }
}

impl Viewer for FrameBuffer {
    fn present(&mut self, frame: &ViewFrame<'_>) {
        self.sprites.clear();
        self.sprites.extend(frame.sprites());
        self.focus = frame.focus;
        self.t = frame.t;
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

pub fn run_2d(sim: SimulationLoop, cfg: &ViewerConfig) -> AppExit {
    println!("run_2d: starting Bevy 2D viewer with {} bodies", sim.system().len());

    let mut frame = FrameBuffer::default();
    frame.present(&sim.frame());

    App::new()
        .insert_resource(sim)
        .insert_resource(frame)
        .insert_resource(ViewSettings {
            scale: cfg.scale,
            ticks_per_frame: cfg.ticks_per_frame,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "rochesim".into(),
                ..Default::default()
            }),
            // closing goes through the loop's quit signal so sinks get flushed
            close_when_requested: false,
            ..Default::default()
        }))
        .add_systems(Startup, setup_bodies_system)
        .add_systems(Update, (quit_request_system, physics_step_system, sync_transforms_system).chain())
        .run()
}

fn setup_bodies_system(
    mut commands: Commands,
    frame: Res<FrameBuffer>,
    settings: Res<ViewSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    // 2D camera, centred on the focus body
    let mut camera = Camera2dBundle::default();
    camera.transform.translation.x = frame.focus.x as f32 * settings.scale;
    camera.transform.translation.y = frame.focus.y as f32 * settings.scale;
    commands.spawn(camera);

    let planet_material = materials.add(ColorMaterial::from(Color::srgb(0.35, 0.55, 1.0)));
    let asteroid_material = materials.add(ColorMaterial::from(Color::WHITE));

    for (i, sprite) in frame.sprites.iter().enumerate() {
        let radius_screen = (sprite.radius as f32).max(0.02) * settings.scale;
        let (material, z) = match sprite.tag {
            BodyTag::Planet => (planet_material.clone(), 0.0),
            BodyTag::Asteroid => (asteroid_material.clone(), 1.0),
        };

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(radius_screen))),
                material,
                transform: Transform::from_xyz(
                    sprite.pos.x as f32 * settings.scale,
                    sprite.pos.y as f32 * settings.scale,
                    z,
                ),
                ..Default::default()
            },
            BodyIndex(i),
        ));
    }
}

fn quit_request_system(
    mut close_requests: EventReader<WindowCloseRequested>,
    keys: Res<ButtonInput<KeyCode>>,
    mut frame: ResMut<FrameBuffer>,
) {
    if close_requests.read().count() > 0 || keys.just_pressed(KeyCode::Escape) {
        frame.quit = true;
    }
}

fn physics_step_system(
    mut sim: ResMut<SimulationLoop>,
    mut frame: ResMut<FrameBuffer>,
    settings: Res<ViewSettings>,
    mut exit: EventWriter<AppExit>,
) {
    let viewer: &mut dyn Viewer = &mut *frame;
    for _ in 0..settings.ticks_per_frame {
        match sim.tick(Some(&mut *viewer)) {
            Ok(LoopState::Terminated(_)) => {
                exit.send(AppExit::Success);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                error!("simulation stopped: {e}");
                exit.send(AppExit::error());
                return;
            }
        }
    }
}

fn sync_transforms_system(
    frame: Res<FrameBuffer>,
    settings: Res<ViewSettings>,
    mut bodies: Query<(&BodyIndex, &mut Transform), Without<Camera2d>>,
    mut camera: Query<&mut Transform, (With<Camera2d>, Without<BodyIndex>)>,
) {
    for (BodyIndex(i), mut transform) in &mut bodies {
        if let Some(s) = frame.sprites.get(*i) {
            transform.translation.x = (s.pos.x as f32) * settings.scale;
            transform.translation.y = (s.pos.y as f32) * settings.scale;
        }
    }

    // camera follows the view target
    if let Ok(mut transform) = camera.get_single_mut() {
        transform.translation.x = (frame.focus.x as f32) * settings.scale;
        transform.translation.y = (frame.focus.y as f32) * settings.scale;
    }
}
