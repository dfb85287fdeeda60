use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use raybox::prelude::*;

const WINDOW_WIDTH: u32 = CANVAS_WIDTH * 2;
const WINDOW_HEIGHT: u32 = CANVAS_HEIGHT * 2;

const DEFAULT_MODEL: &str = "cornell-box.obj";
const MODEL_SCALE: f32 = 0.35;

const MOVE_STEP: f32 = 0.1;
const ORBIT_STEP: f32 = 0.05;
const LIGHT_STEP: f32 = 0.1;

fn process_input(event_pump: &mut sdl2::EventPump, engine: &mut Engine) -> bool {
    for event in event_pump.poll_iter() {
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => return false,
            Event::KeyDown {
                keycode: Some(key), ..
            } => handle_key(key, engine),
            _ => {}
        }
    }
    true
}

fn handle_key(key: Keycode, engine: &mut Engine) {
    match key {
        // Render paths
        Keycode::Num1 => engine.set_render_mode(RenderMode::PointCloud),
        Keycode::Num2 => engine.set_render_mode(RenderMode::Wireframe),
        Keycode::Num3 => engine.set_render_mode(RenderMode::Raster),
        Keycode::Num4 => engine.set_render_mode(RenderMode::Raytrace),

        // Camera movement
        Keycode::W => engine.translate_camera(Vec3::new(0.0, 0.0, -MOVE_STEP)),
        Keycode::S => engine.translate_camera(Vec3::new(0.0, 0.0, MOVE_STEP)),
        Keycode::A => engine.translate_camera(Vec3::new(-MOVE_STEP, 0.0, 0.0)),
        Keycode::D => engine.translate_camera(Vec3::new(MOVE_STEP, 0.0, 0.0)),
        Keycode::Q => engine.translate_camera(Vec3::new(0.0, MOVE_STEP, 0.0)),
        Keycode::E => engine.translate_camera(Vec3::new(0.0, -MOVE_STEP, 0.0)),

        // Orbit around the scene
        Keycode::Left => engine.orbit_camera(0.0, -ORBIT_STEP),
        Keycode::Right => engine.orbit_camera(0.0, ORBIT_STEP),
        Keycode::Up => engine.orbit_camera(ORBIT_STEP, 0.0),
        Keycode::Down => engine.orbit_camera(-ORBIT_STEP, 0.0),

        // Light movement
        Keycode::J => engine.move_light(Vec3::new(-LIGHT_STEP, 0.0, 0.0)),
        Keycode::L => engine.move_light(Vec3::new(LIGHT_STEP, 0.0, 0.0)),
        Keycode::I => engine.move_light(Vec3::new(0.0, LIGHT_STEP, 0.0)),
        Keycode::K => engine.move_light(Vec3::new(0.0, -LIGHT_STEP, 0.0)),
        Keycode::U => engine.move_light(Vec3::new(0.0, 0.0, -LIGHT_STEP)),
        Keycode::O => engine.move_light(Vec3::new(0.0, 0.0, LIGHT_STEP)),

        // Lighting toggles
        Keycode::Z => toggle(engine, |l| &mut l.ambient),
        Keycode::X => toggle(engine, |l| &mut l.proximity),
        Keycode::C => toggle(engine, |l| &mut l.incidence),
        Keycode::V => toggle(engine, |l| &mut l.specular),
        Keycode::H => toggle(engine, |l| &mut l.hard_shadows),
        Keycode::B => toggle(engine, |l| &mut l.soft_shadows),
        Keycode::R => toggle(engine, |l| &mut l.reflections),
        Keycode::P => toggle(engine, |l| &mut l.phong),
        Keycode::F => toggle(engine, |l| &mut l.filter),
        _ => {}
    }
}

fn toggle(engine: &mut Engine, field: impl Fn(&mut LightingConfig) -> &mut bool) {
    let flag = field(engine.lighting_mut());
    *flag = !*flag;
}

fn main() -> Result<(), String> {
    env_logger::init();

    let model_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let scene = loader::load_scene(&model_path, MODEL_SCALE).map_err(|e| e.to_string())?;
    let mut engine = Engine::new(scene);

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window("raybox", WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();

    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::ARGB8888, engine.width(), engine.height())
        .map_err(|e| e.to_string())?;

    let mut event_pump = sdl_context.event_pump()?;

    while process_input(&mut event_pump, &mut engine) {
        engine.render().map_err(|e| e.to_string())?;

        texture
            .update(None, engine.frame_bytes(), (engine.width() * 4) as usize)
            .map_err(|e| e.to_string())?;

        canvas.clear();
        canvas.copy(
            &texture,
            None,
            Some(Rect::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT)),
        )?;
        canvas.present();
    }

    Ok(())
}
