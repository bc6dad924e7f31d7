/// Tests for PickingTexture sizing, resolution and debug modes.

use super::*;
use crate::renderer::mock_renderer::{Journal, MockRenderer};
use crate::resource::mock_loaders::MockShaderCompiler;

type Pixels = Arc<Mutex<rustc_hash::FxHashMap<(u32, u32), [u32; 4]>>>;

struct Fixture {
    picker: PickingTexture,
    shaders: ShaderCache,
    journal: Journal,
    pixels: Pixels,
    responses: Arc<Mutex<Vec<PickingResponse>>>,
}

fn fixture() -> Fixture {
    let mock = MockRenderer::new();
    let journal = mock.journal();
    let pixels = mock.pixels();
    let renderer: Arc<Mutex<dyn Renderer>> = Arc::new(Mutex::new(mock));
    let compiler = MockShaderCompiler::new()
        .with_render_modes(PICKING_SHADER, &["ObjectId", "MeshId"]);
    let mut shaders = ShaderCache::new(Box::new(compiler));

    let responses = Arc::new(Mutex::new(Vec::new()));
    let sink = responses.clone();
    let picker = PickingTexture::new(
        renderer,
        &mut shaders,
        Box::new(move |response| sink.lock().unwrap().push(response)),
    ).unwrap();

    Fixture { picker, shaders, journal, pixels, responses }
}

// ============================================================================
// resize
// ============================================================================

#[test]
fn test_resize_allocates_uint_target() {
    let mut f = fixture();
    assert!(f.picker.framebuffer().is_none());

    f.picker.resize(320, 200).unwrap();

    let fb = f.picker.framebuffer().unwrap();
    assert_eq!((fb.width(), fb.height()), (320, 200));
    assert!(f.journal.lock().unwrap().contains(&"create_framebuffer:picking:320x200".to_string()));
}

#[test]
fn test_resize_releases_previous_target() {
    let mut f = fixture();
    f.picker.resize(320, 200).unwrap();

    f.picker.resize(640, 400).unwrap();

    let journal = f.journal.lock().unwrap();
    let released = journal.iter().position(|e| e == "release_framebuffer:picking").unwrap();
    let created = journal.iter().position(|e| e == "create_framebuffer:picking:640x400").unwrap();
    assert!(released < created);
}

#[test]
fn test_resize_to_zero_drops_target() {
    let mut f = fixture();
    f.picker.resize(320, 200).unwrap();

    f.picker.resize(0, 200).unwrap();

    assert!(f.picker.framebuffer().is_none());
}

// ============================================================================
// request / finish
// ============================================================================

#[test]
fn test_request_is_active_for_one_frame() {
    let mut f = fixture();
    f.picker.resize(100, 100).unwrap();

    f.picker.request(PickingRequest { intent: PickingIntent::Select, cursor_x: 1, cursor_y: 1 });
    assert!(f.picker.is_active());

    f.picker.finish().unwrap();
    assert!(!f.picker.is_active());
}

#[test]
fn test_take_request_leaves_picker_idle() {
    let mut f = fixture();
    f.picker.resize(100, 100).unwrap();
    let request = PickingRequest { intent: PickingIntent::Open, cursor_x: 3, cursor_y: 4 };
    f.picker.request(request);

    assert_eq!(f.picker.take_request(), Some(request));
    assert!(!f.picker.is_active());

    f.picker.finish().unwrap();
    assert!(f.responses.lock().unwrap().is_empty());
}

#[test]
fn test_finish_reads_flipped_texel() {
    let mut f = fixture();
    f.picker.resize(100, 50).unwrap();
    f.pixels.lock().unwrap().insert((10, 39), [7, 3, 0, 0]);

    f.picker.request(PickingRequest { intent: PickingIntent::Open, cursor_x: 10, cursor_y: 10 });
    f.picker.finish().unwrap();

    let responses = f.responses.lock().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].intent, PickingIntent::Open);
    assert_eq!(responses[0].pixel_info.object_id, 7);
    assert_eq!(responses[0].pixel_info.mesh_id, 3);
    assert!(f.journal.lock().unwrap().contains(&"read_pixel:picking:10,39".to_string()));
}

#[test]
fn test_finish_without_request_does_nothing() {
    let mut f = fixture();
    f.picker.resize(100, 50).unwrap();

    f.picker.finish().unwrap();

    assert!(f.responses.lock().unwrap().is_empty());
}

#[test]
fn test_finish_outside_target_reports_nothing_picked() {
    let mut f = fixture();
    f.picker.resize(100, 50).unwrap();

    f.picker.request(PickingRequest { intent: PickingIntent::Select, cursor_x: 500, cursor_y: 5 });
    f.picker.finish().unwrap();

    let responses = f.responses.lock().unwrap();
    assert_eq!(responses[0].pixel_info, PixelInfo::default());
}

#[test]
fn test_finish_before_resize_is_invalid_state() {
    let mut f = fixture();

    f.picker.request(PickingRequest { intent: PickingIntent::Select, cursor_x: 0, cursor_y: 0 });

    assert!(matches!(f.picker.finish(), Err(Error::InvalidState(_))));
}

// ============================================================================
// set_render_mode
// ============================================================================

#[test]
fn test_supported_mode_selects_debug_shader() {
    let mut f = fixture();

    f.picker.set_render_mode(&mut f.shaders, Some("ObjectId")).unwrap();

    let debug = f.picker.debug_shader().unwrap();
    assert_eq!(debug.label(), "vrf.picking[ObjectId]");
    assert_eq!(f.picker.render_modes(), &["ObjectId".to_string(), "MeshId".to_string()]);
}

#[test]
fn test_unsupported_mode_clears_debug_shader() {
    let mut f = fixture();
    f.picker.set_render_mode(&mut f.shaders, Some("MeshId")).unwrap();

    f.picker.set_render_mode(&mut f.shaders, Some("Normals")).unwrap();
    assert!(f.picker.debug_shader().is_none());

    f.picker.set_render_mode(&mut f.shaders, None).unwrap();
    assert!(f.picker.debug_shader().is_none());
}
