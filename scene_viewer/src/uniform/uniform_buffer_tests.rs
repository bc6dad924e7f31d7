/// Tests for UniformBuffer allocation, upload and release.

use super::*;
use glam::Vec4;
use crate::renderer::mock_renderer::{MockCommandList, MockRenderer};
use crate::uniform::{ViewConstants, VIEW_CONSTANTS_SLOT};

fn create_renderer() -> (Arc<Mutex<dyn Renderer>>, crate::renderer::mock_renderer::Journal) {
    let mock = MockRenderer::new();
    let journal = mock.journal();
    let renderer: Arc<Mutex<dyn Renderer>> = Arc::new(Mutex::new(mock));
    (renderer, journal)
}

#[test]
fn test_new_allocates_block_sized_buffer() {
    let (renderer, journal) = create_renderer();

    let ubo = UniformBuffer::<ViewConstants>::new(&renderer, VIEW_CONSTANTS_SLOT, "view").unwrap();

    assert_eq!(ubo.buffer().size(), 272);
    assert_eq!(ubo.slot(), 0);
    assert!(journal.lock().unwrap().contains(&"create_buffer:view".to_string()));
}

#[test]
fn test_update_pushes_cpu_copy_once() {
    let (renderer, journal) = create_renderer();
    let mut ubo = UniformBuffer::<ViewConstants>::new(&renderer, 0, "view").unwrap();

    ubo.data_mut().clear_color = Vec4::new(1.0, 0.5, 0.25, 1.0);
    ubo.data_mut().time = 2.0;
    ubo.update().unwrap();

    let uploads = journal.lock().unwrap().iter()
        .filter(|e| *e == "update_buffer:view")
        .count();
    assert_eq!(uploads, 1);
    assert_eq!(ubo.data().time, 2.0);
}

#[test]
fn test_bind_uses_fixed_slot() {
    let (renderer, journal) = create_renderer();
    let ubo = UniformBuffer::<ViewConstants>::new(&renderer, 1, "lighting").unwrap();
    let mut cmd = MockCommandList::new(journal.clone());

    ubo.bind(&mut cmd).unwrap();

    assert!(journal.lock().unwrap().contains(&"cmd:bind_uniform:1:lighting".to_string()));
}

#[test]
fn test_release_frees_device_buffer() {
    let (renderer, journal) = create_renderer();
    let ubo = UniformBuffer::<ViewConstants>::new(&renderer, 0, "view").unwrap();

    ubo.release();

    assert_eq!(journal.lock().unwrap().last().unwrap(), "release_buffer:view");
}
