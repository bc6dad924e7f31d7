/// Tests for ShaderCache lookup, clearing and stage-then-swap reloads.

use super::*;
use crate::resource::mock_loaders::MockShaderCompiler;

fn cache() -> (ShaderCache, Arc<std::sync::Mutex<crate::resource::mock_loaders::MockShaderState>>) {
    let compiler = MockShaderCompiler::new()
        .with_render_modes(PICKING_SHADER, &["ObjectId", "MeshId"]);
    let state = compiler.state();
    (ShaderCache::new(Box::new(compiler)), state)
}

// ============================================================================
// get
// ============================================================================

#[test]
fn test_get_compiles_once_and_caches() {
    let (mut cache, state) = cache();

    let a = cache.get(GRID_SHADER, None).unwrap();
    let b = cache.get(GRID_SHADER, None).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(state.lock().unwrap().compiled, vec![GRID_SHADER.to_string()]);
    assert_eq!(cache.shader_count(), 1);
}

#[test]
fn test_render_mode_variants_are_distinct() {
    let (mut cache, _) = cache();

    let default = cache.get(PICKING_SHADER, None).unwrap();
    let object_id = cache.get(PICKING_SHADER, Some("ObjectId")).unwrap();

    assert_ne!(default.id(), object_id.id());
    assert_eq!(object_id.render_mode(), Some("ObjectId"));
    assert_eq!(object_id.label(), "vrf.picking[ObjectId]");
    assert!(default.supports_render_mode("MeshId"));
    assert_eq!(cache.shader_count(), 2);
}

#[test]
fn test_compile_failure_is_shader_compilation_error() {
    let (mut cache, state) = cache();
    state.lock().unwrap().failing.push(GRID_SHADER.to_string());

    match cache.get(GRID_SHADER, None) {
        Err(Error::ShaderCompilation { shader, message }) => {
            assert_eq!(shader, GRID_SHADER);
            assert!(message.contains("syntax error"));
        }
        other => panic!("unexpected result: {:?}", other.map(|p| p.label())),
    }
    assert_eq!(cache.shader_count(), 0);
}

// ============================================================================
// clear_cache / reload
// ============================================================================

#[test]
fn test_clear_cache_keeps_handles_alive() {
    let (mut cache, _) = cache();
    let handle = cache.get(GRID_SHADER, None).unwrap();

    cache.clear_cache();

    assert_eq!(cache.shader_count(), 0);
    assert_eq!(handle.name(), GRID_SHADER);
    let recompiled = cache.get(GRID_SHADER, None).unwrap();
    assert!(!Arc::ptr_eq(&handle, &recompiled));
}

#[test]
fn test_reload_swaps_in_required_programs() {
    let (mut cache, _) = cache();
    let old_grid = cache.get(GRID_SHADER, None).unwrap();
    cache.get("vrf.complex", None).unwrap();

    cache.reload(&[
        ShaderKey::new(GRID_SHADER, None),
        ShaderKey::new(PICKING_SHADER, None),
    ]).unwrap();

    assert_eq!(cache.shader_count(), 2);
    let new_grid = cache.get(GRID_SHADER, None).unwrap();
    assert!(!Arc::ptr_eq(&old_grid, &new_grid));
}

#[test]
fn test_failed_reload_keeps_live_cache() {
    let (mut cache, state) = cache();
    let grid = cache.get(GRID_SHADER, None).unwrap();
    let complex = cache.get("vrf.complex", None).unwrap();
    state.lock().unwrap().failing.push(PICKING_SHADER.to_string());

    let result = cache.reload(&[
        ShaderKey::new(GRID_SHADER, None),
        ShaderKey::new(PICKING_SHADER, None),
    ]);

    assert!(result.is_err());
    assert_eq!(cache.shader_count(), 2);
    assert!(Arc::ptr_eq(&grid, &cache.get(GRID_SHADER, None).unwrap()));
    assert!(Arc::ptr_eq(&complex, &cache.get("vrf.complex", None).unwrap()));
}
