/// Orchestrator - lifecycle and per-frame draw sequence of one viewer
///
/// Owns the scene, the optional skybox scene, both cameras, the uniform
/// buffers, the shader cache and the debug overlays. The host event loop
/// drives it through `on_load`, `on_paint`, `on_resize` and
/// `on_pointer_click`, and only for the hooks currently registered.
///
/// States: `Unloaded -> Loading -> Ready`, and `Disposed` from any state.
/// Every `Ready` paint runs Update, Cull, Upload, then Draw. Each uniform
/// buffer is pushed once per paint no matter how many passes read it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use crossbeam_channel::{Receiver, Sender};
use glam::Vec3;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use crate::camera::{Camera, DepthPartition, Frustum};
use crate::config::ViewerConfig;
use crate::debug::{InfiniteGrid, OctreeDebugRenderer, SelectedNodeRenderer};
use crate::error::{Error, Result};
use crate::hot_reload::{FileChangeEvent, HotReloadCoordinator, ReloadDecision, ShaderWatcher};
use crate::picking::{PickingCallback, PickingIntent, PickingRequest, PickingResponse, PickingTexture};
use crate::renderer::{ClearValue, CommandList, Framebuffer, PolygonMode, Renderer, Viewport};
use crate::resource::{
    MaterialLoader, RawAsset, ResourceLoader, ShaderCache, ShaderCompiler, ShaderKey, ShaderProgram,
    Texture, GRID_SHADER, PICKING_SHADER,
};
use crate::scene::{RenderContext, Scene, UpdateContext};
use crate::uniform::{LightingConstants, UniformBuffer, ViewConstants, LIGHTING_CONSTANTS_SLOT, VIEW_CONSTANTS_SLOT};
use crate::{viewer_debug, viewer_error, viewer_info, viewer_warn};
use super::controls::{ReloadNotification, ViewerControls, ViewerFlags};
use super::hooks::{EventSource, Hook, HookSet};
use super::scene_viewer::{LoadContext, PickContext, SceneViewer, Skybox};

/// Game-content path of the BRDF lookup texture
pub const BRDF_LOOKUP_PATH: &str = "textures/dev/ggx_integrate_brdf_lut_schlick.vtex_c";
/// Embedded copy used when the content has no BRDF lookup texture
pub const BRDF_LOOKUP_EMBEDDED: &str = "ggx_integrate_brdf_lut_schlick.vtex_c";
/// Embedded cube texture used by fog without a texture of its own
pub const DEFAULT_FOG_TEXTURE: &str = "default_cube.vtex_c";
/// Shader-visible name of the BRDF lookup reserved texture
pub const BRDF_LOOKUP_NAME: &str = "g_tBRDFLookup";
/// First sampler slot of the reserved textures
pub const RESERVED_TEXTURE_SLOT: u32 = 16;

// ===== COLLABORATORS =====

/// External services the viewer consumes
pub struct Collaborators {
    pub resources: Box<dyn ResourceLoader>,
    pub materials: Box<dyn MaterialLoader>,
    pub shader_compiler: Box<dyn ShaderCompiler>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Unloaded,
    Loading,
    Ready,
    Disposed,
}

/// View and lighting constant buffers of one scene
struct SceneBuffers {
    view: UniformBuffer<ViewConstants>,
    lighting: UniformBuffer<LightingConstants>,
}

impl SceneBuffers {
    fn new(renderer: &Arc<Mutex<dyn Renderer>>, prefix: &str) -> Result<Self> {
        Ok(Self {
            view: UniformBuffer::new(renderer, VIEW_CONSTANTS_SLOT, &format!("{}view", prefix))?,
            lighting: UniformBuffer::new(renderer, LIGHTING_CONSTANTS_SLOT, &format!("{}lighting", prefix))?,
        })
    }

    /// Fill both blocks from `camera` and `scene` and push them once
    fn upload(&mut self, camera: &Camera, scene: &Scene, uptime: f32) -> Result<()> {
        let view = self.view.data_mut();
        camera.set_view_constants(view);
        scene.fog().set_view_constants(view);
        view.time = uptime;

        scene.lighting().set_lighting_constants(
            self.lighting.data_mut(),
            scene.env_map_probes().len() as u32,
        );

        self.view.update()?;
        self.lighting.update()
    }

    fn bind(&self, cmd: &mut dyn CommandList) -> Result<()> {
        self.view.bind(cmd)?;
        self.lighting.bind(cmd)
    }

    fn release(self) {
        self.view.release();
        self.lighting.release();
    }
}

// ===== ORCHESTRATOR =====

pub struct Orchestrator {
    config: ViewerConfig,
    state: ViewerState,
    renderer: Arc<Mutex<dyn Renderer>>,
    viewer: Box<dyn SceneViewer>,
    resources: Box<dyn ResourceLoader>,
    materials: Box<dyn MaterialLoader>,
    shaders: ShaderCache,
    hooks: HookSet,
    controls: ViewerControls,
    depth_partition: DepthPartition,

    camera: Camera,
    skybox_camera: Camera,
    locked_frustum: Option<Frustum>,
    locked_skybox_frustum: Option<Frustum>,

    scene: Scene,
    skybox: Option<Skybox>,
    main_buffers: Option<SceneBuffers>,
    skybox_buffers: Option<SceneBuffers>,
    reserved_textures: Vec<(String, Arc<Texture>)>,
    uptime: f32,

    grid: Option<InfiniteGrid>,
    selection: Option<SelectedNodeRenderer>,
    static_octree_renderer: Option<OctreeDebugRenderer>,
    dynamic_octree_renderer: Option<OctreeDebugRenderer>,

    pick_sender: Sender<PickingResponse>,
    pick_receiver: Receiver<PickingResponse>,

    hot_reload: HotReloadCoordinator,
    watcher: Option<ShaderWatcher>,
    file_sender: Sender<FileChangeEvent>,
    file_receiver: Receiver<FileChangeEvent>,
    notification: Option<ReloadNotification>,
}

impl Orchestrator {
    /// Create an unloaded viewer and register the load and resize hooks.
    ///
    /// A shader watcher is started when hot reload is enabled and a shader
    /// directory is configured. Failing to watch only disables hot reload.
    pub fn new(
        config: ViewerConfig,
        renderer: Arc<Mutex<dyn Renderer>>,
        mut viewer: Box<dyn SceneViewer>,
        collaborators: Collaborators,
        events: Box<dyn EventSource>,
    ) -> Result<Self> {
        let depth_partition = DepthPartition::new(config.depth_split)?;

        let mut hooks = HookSet::new(events);
        hooks.register(Hook::Load);
        hooks.register(Hook::Resize);

        let (file_sender, file_receiver) = crossbeam_channel::unbounded();
        let (pick_sender, pick_receiver) = crossbeam_channel::unbounded();

        let watcher = match (&config.hot_reload.shader_directory, config.hot_reload.enabled) {
            (Some(directory), true) => match ShaderWatcher::new(directory, file_sender.clone()) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    viewer_warn!("viewer::Orchestrator", "Shader hot reload disabled: {}", e);
                    None
                }
            },
            _ => None,
        };

        let mut controls = ViewerControls::default();
        viewer.initialize_control(&mut controls);

        viewer_debug!("viewer::Orchestrator", "Created '{}'", viewer.name());

        Ok(Self {
            camera: Camera::new(&config.camera),
            skybox_camera: Camera::new(&config.camera),
            scene: Scene::new(&config.octree),
            hot_reload: HotReloadCoordinator::new(&config.hot_reload),
            state: ViewerState::Unloaded,
            renderer,
            viewer,
            resources: collaborators.resources,
            materials: collaborators.materials,
            shaders: ShaderCache::new(collaborators.shader_compiler),
            hooks,
            controls,
            depth_partition,
            locked_frustum: None,
            locked_skybox_frustum: None,
            skybox: None,
            main_buffers: None,
            skybox_buffers: None,
            reserved_textures: Vec::new(),
            uptime: 0.0,
            grid: None,
            selection: None,
            static_octree_renderer: None,
            dynamic_octree_renderer: None,
            pick_sender,
            pick_receiver,
            watcher,
            file_sender,
            file_receiver,
            notification: None,
            config,
        })
    }

    // ===== LIFECYCLE =====

    pub fn state(&self) -> ViewerState {
        self.state
    }

    /// Allocate GPU state, let the viewer fill the scene and frame it.
    ///
    /// Swaps the load hook for the paint and pointer-click hooks.
    pub fn on_load(&mut self) -> Result<()> {
        if self.state != ViewerState::Unloaded {
            return Err(Error::InvalidState(format!("on_load in state {:?}", self.state)));
        }
        self.state = ViewerState::Loading;

        self.grid = Some(InfiniteGrid::new(&mut self.shaders)?);
        self.selection = Some(SelectedNodeRenderer::new(self.renderer.clone(), &mut self.shaders)?);

        let framebuffer = self.lock_renderer()?.main_framebuffer();
        let (width, height) = (framebuffer.width(), framebuffer.height());
        self.camera.set_viewport_size(width, height)?;
        self.attach_picker(width, height)?;

        self.main_buffers = Some(SceneBuffers::new(&self.renderer, "")?);

        let start = Instant::now();
        self.pre_scene_load();
        {
            let mut context = LoadContext {
                renderer: &self.renderer,
                shaders: &mut self.shaders,
                resources: self.resources.as_ref(),
                materials: self.materials.as_mut(),
                scene: &mut self.scene,
                skybox: &mut self.skybox,
                controls: &mut self.controls,
                config: &self.config,
            };
            self.viewer.load_scene(&mut context)?;
        }
        viewer_debug!(
            "viewer::Orchestrator",
            "Loaded '{}' in {:?} ({} shader variants, {} materials)",
            self.viewer.name(),
            start.elapsed(),
            self.shaders.shader_count(),
            self.materials.material_count()
        );

        self.post_scene_load()?;

        self.hooks.unregister(Hook::Load);
        self.hooks.register(Hook::Paint);
        self.hooks.register(Hook::PointerClick);

        self.materials.clear_cache();
        self.state = ViewerState::Ready;
        Ok(())
    }

    /// Release subscriptions, then uniform buffers, then the picking target.
    pub fn dispose(&mut self) {
        if self.state == ViewerState::Disposed {
            return;
        }

        self.hooks.unregister_all();
        self.watcher = None;

        if let Some(buffers) = self.main_buffers.take() {
            buffers.release();
        }
        if let Some(buffers) = self.skybox_buffers.take() {
            buffers.release();
        }
        if let Some(picker) = self.camera.take_picker() {
            picker.release();
        }

        self.state = ViewerState::Disposed;
        viewer_debug!("viewer::Orchestrator", "Disposed '{}'", self.viewer.name());
    }

    fn pre_scene_load(&mut self) {
        let brdf = match self.resources.load(BRDF_LOOKUP_PATH) {
            Some(asset) => Ok(asset),
            None => {
                viewer_debug!("viewer::Orchestrator", "{} not found, using embedded copy", BRDF_LOOKUP_PATH);
                self.resources.load_embedded(BRDF_LOOKUP_EMBEDDED)
            }
        };
        if let Some(texture) = self.decode_texture(brdf) {
            self.reserved_textures.push((BRDF_LOOKUP_NAME.to_string(), texture));
        }

        let fog = self.resources.load_embedded(DEFAULT_FOG_TEXTURE);
        if let Some(texture) = self.decode_texture(fog) {
            self.scene.fog_mut().default_fog_texture = Some(texture);
        }
    }

    /// Optional textures that fail to load or decode are skipped.
    fn decode_texture(&mut self, asset: Result<RawAsset>) -> Option<Arc<Texture>> {
        match asset.and_then(|asset| self.materials.load_texture(&asset)) {
            Ok(texture) => Some(texture),
            Err(e) => {
                viewer_warn!("viewer::Orchestrator", "Skipping texture: {}", e);
                None
            }
        }
    }

    fn post_scene_load(&mut self) -> Result<()> {
        self.scene.calculate_environment_maps();
        if let Some(skybox) = &mut self.skybox {
            skybox.scene.calculate_environment_maps();
        }

        self.frame_scene();

        self.static_octree_renderer = Some(OctreeDebugRenderer::new(self.renderer.clone(), &mut self.shaders, false)?);
        self.dynamic_octree_renderer = Some(OctreeDebugRenderer::new(self.renderer.clone(), &mut self.shaders, true)?);
        self.build_static_octree_if_shown()?;

        if self.skybox.is_some() {
            self.skybox_buffers = Some(SceneBuffers::new(&self.renderer, "skybox.")?);
        }

        self.set_available_render_modes(0);

        let background = self.config.background_color;
        for buffers in self.main_buffers.iter_mut().chain(self.skybox_buffers.iter_mut()) {
            buffers.view.data_mut().clear_color = background;
        }
        Ok(())
    }

    /// Look at the scene from above one corner, or use the configured pose.
    fn frame_scene(&mut self) {
        let bounds = self.scene.compute_framing_bounds();
        if self.viewer.frames_scene() && !bounds.is_empty() {
            let location = Vec3::new(bounds.max.z + 1.0, 0.0, bounds.max.z) * 1.5;
            self.camera.set_location(location);
            self.camera.look_at(bounds.center());
        } else {
            self.camera.set_location(self.config.default_camera_location);
            self.camera.look_at(self.config.default_camera_target);
        }
    }

    // ===== HOST CALLBACKS =====

    /// Run one frame. Paints before load completes are ignored.
    pub fn on_paint(&mut self, frame_time: f32) -> Result<()> {
        if self.state != ViewerState::Ready {
            viewer_debug!("viewer::Orchestrator", "Paint ignored in state {:?}", self.state);
            return Ok(());
        }

        self.process_file_events();

        // Update
        self.uptime += frame_time;
        let update = UpdateContext { frame_time, uptime: self.uptime };
        self.scene.update(&update);
        if let Some(skybox) = &mut self.skybox {
            skybox.scene.update(&update);
        }
        self.update_skybox_camera();
        if let Some(selection) = &mut self.selection {
            selection.update(&update);
        }

        // Cull
        self.scene.collect_draw_calls(Some(&self.camera), self.locked_frustum.as_ref());
        if let Some(skybox) = &mut self.skybox {
            skybox.scene.collect_draw_calls(Some(&self.skybox_camera), self.locked_skybox_frustum.as_ref());
        }

        // Upload
        if let Some(buffers) = &mut self.main_buffers {
            buffers.upload(&self.camera, &self.scene, self.uptime)?;
        }
        if let (Some(buffers), Some(skybox)) = (&mut self.skybox_buffers, &self.skybox) {
            buffers.upload(&self.skybox_camera, &skybox.scene, self.uptime)?;
        }

        // Draw
        if self.camera.picker().is_some_and(PickingTexture::is_active) {
            self.render_picking_pass()?;
            self.dispatch_picks();
        }
        self.render_main_pass()
    }

    pub fn on_resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        if size.width == 0 || size.height == 0 {
            viewer_debug!("viewer::Orchestrator", "Ignoring resize to {}x{}", size.width, size.height);
            return Ok(());
        }
        self.lock_renderer()?.resize(size.width, size.height);
        self.camera.set_viewport_size(size.width, size.height)
    }

    /// Schedule a pick under `position` for the next paint.
    pub fn on_pointer_click(&mut self, position: PhysicalPosition<f64>, intent: PickingIntent) {
        if self.state != ViewerState::Ready {
            return;
        }
        if let Some(picker) = self.camera.picker_mut() {
            picker.request(PickingRequest {
                intent,
                cursor_x: position.x.max(0.0) as u32,
                cursor_y: position.y.max(0.0) as u32,
            });
        }
    }

    // ===== CONTROLS =====

    pub fn controls(&self) -> &ViewerControls {
        &self.controls
    }

    pub fn flags(&self) -> ViewerFlags {
        self.controls.flags
    }

    pub fn set_flag(&mut self, flag: ViewerFlags, enabled: bool) -> Result<()> {
        self.controls.flags.set(flag, enabled);

        if flag.contains(ViewerFlags::LOCK_FRUSTUM) {
            if enabled {
                self.locked_frustum = Some(self.camera.frustum().locked());
                self.locked_skybox_frustum = Some(self.skybox_camera.frustum().locked());
                viewer_info!("viewer::Orchestrator", "Frustum locked");
            } else {
                self.locked_frustum = None;
                self.locked_skybox_frustum = None;
                viewer_info!("viewer::Orchestrator", "Frustum unlocked");
            }
        }

        if flag.contains(ViewerFlags::TOOL_MATERIALS) {
            self.scene.set_show_tool_materials(enabled);
            if let Some(skybox) = &mut self.skybox {
                skybox.scene.set_show_tool_materials(enabled);
            }
            self.rebuild_static_octree_renderer()?;
        }

        if flag.contains(ViewerFlags::STATIC_OCTREE) {
            self.build_static_octree_if_shown()?;
        }
        Ok(())
    }

    /// Enable only `layers` in both scenes and rebuild the static octree view.
    pub fn set_enabled_layers(&mut self, layers: &[String]) -> Result<()> {
        self.scene.set_enabled_layers(layers.iter().cloned());
        self.scene.calculate_environment_maps();
        if let Some(skybox) = &mut self.skybox {
            skybox.scene.set_enabled_layers(layers.iter().cloned());
            skybox.scene.calculate_environment_maps();
        }

        self.rebuild_static_octree_renderer()
    }

    /// Occupied static cells changed; drop the built outlines.
    fn rebuild_static_octree_renderer(&mut self) -> Result<()> {
        if self.static_octree_renderer.is_some() {
            self.static_octree_renderer = Some(OctreeDebugRenderer::new(self.renderer.clone(), &mut self.shaders, false)?);
            self.build_static_octree_if_shown()?;
        }
        Ok(())
    }

    /// Render modes offered to the host, default entry first
    pub fn render_modes(&self) -> &[String] {
        self.controls.render_modes.entries()
    }

    pub fn select_render_mode(&mut self, index: usize) -> Result<()> {
        let mode = self.controls.render_modes.mode_at(index)?.map(str::to_string);
        self.set_render_mode(mode.as_deref())
    }

    /// Switch every scene node, the selection and the picker to `mode`.
    pub fn set_render_mode(&mut self, mode: Option<&str>) -> Result<()> {
        if self.state != ViewerState::Ready {
            return Err(Error::InvalidState(format!("set_render_mode in state {:?}", self.state)));
        }

        if let Some(picker) = self.camera.picker_mut() {
            picker.set_render_mode(&mut self.shaders, mode)?;
        }
        self.scene.set_render_mode(&mut self.shaders, mode)?;
        if let Some(skybox) = &mut self.skybox {
            skybox.scene.set_render_mode(&mut self.shaders, mode)?;
        }
        if let Some(selection) = &mut self.selection {
            selection.set_render_mode(&mut self.shaders, mode)?;
        }

        self.controls.render_modes.select_mode(mode);
        Ok(())
    }

    fn set_available_render_modes(&mut self, selected: usize) {
        let mut modes = self.scene.supported_render_modes();
        if let Some(picker) = self.camera.picker() {
            modes.extend(picker.render_modes().iter().cloned());
        }
        self.controls.render_modes.set_modes(modes, selected);
    }

    // ===== HOT RELOAD =====

    /// Sender for file change events, drained at the start of each paint
    pub fn file_event_sender(&self) -> Sender<FileChangeEvent> {
        self.file_sender.clone()
    }

    /// Reload now, bypassing the debounce windows.
    ///
    /// Does nothing while another reload holds the gate. A compile failure
    /// is returned and also kept as the pending notification.
    pub fn reload_shaders(&mut self) -> Result<()> {
        if self.state != ViewerState::Ready {
            return Err(Error::InvalidState(format!("reload_shaders in state {:?}", self.state)));
        }
        self.run_reload()
    }

    /// Take the pending reload notification, if any
    pub fn take_notification(&mut self) -> Option<ReloadNotification> {
        self.notification.take()
    }

    pub fn notification(&self) -> Option<&ReloadNotification> {
        self.notification.as_ref()
    }

    fn process_file_events(&mut self) {
        let mut accepted = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            if self.hot_reload.on_file_event(&event, Instant::now()) == ReloadDecision::Accepted {
                accepted = true;
            }
        }
        if accepted {
            // Already logged and kept as the notification.
            let _ = self.run_reload();
        }
    }

    fn run_reload(&mut self) -> Result<()> {
        let Some(guard) = self.hot_reload.try_begin(Instant::now()) else {
            viewer_debug!("viewer::Orchestrator", "Shader reload already in progress");
            return Ok(());
        };

        let result = self.reload_shader_programs();
        let elapsed = self.hot_reload.finish(Instant::now());
        drop(guard);

        match &result {
            Ok(()) => {
                self.notification = None;
                viewer_debug!(
                    "viewer::Orchestrator",
                    "Reloaded shaders in {:?} ({} shader variants)",
                    elapsed,
                    self.shaders.shader_count()
                );
            }
            Err(e) => {
                viewer_error!("viewer::Orchestrator", "Failed to reload shaders: {}", e);
                self.notification = Some(ReloadNotification {
                    title: "Failed to reload shaders".to_string(),
                    message: e.to_string(),
                });
            }
        }
        result
    }

    fn reload_shader_programs(&mut self) -> Result<()> {
        self.shaders.reload(&[
            ShaderKey::new(GRID_SHADER, None),
            ShaderKey::new(PICKING_SHADER, None),
        ])?;

        let (width, height) = self.camera.viewport_size();
        let pending = match self.camera.take_picker() {
            Some(mut picker) => {
                let pending = picker.take_request();
                picker.release();
                pending
            }
            None => None,
        };
        self.attach_picker(width, height)?;
        if let (Some(request), Some(picker)) = (pending, self.camera.picker_mut()) {
            picker.request(request);
        }

        if let Some(grid) = &mut self.grid {
            grid.reload_shader(&mut self.shaders)?;
        }

        let selected = self.controls.render_modes.selected_index();
        let mode = self.controls.render_modes.selected_mode().map(str::to_string);
        self.set_render_mode(mode.as_deref())?;
        self.set_available_render_modes(selected);
        Ok(())
    }

    // ===== DRAWING =====

    fn attach_picker(&mut self, width: u32, height: u32) -> Result<()> {
        let mut picker = PickingTexture::new(
            self.renderer.clone(),
            &mut self.shaders,
            picking_callback(self.pick_sender.clone()),
        )?;
        picker.resize(width, height)?;
        self.camera.set_picker(picker);
        Ok(())
    }

    fn build_static_octree_if_shown(&mut self) -> Result<()> {
        if !self.controls.flags.contains(ViewerFlags::STATIC_OCTREE) {
            return Ok(());
        }
        match &mut self.static_octree_renderer {
            Some(renderer) if !renderer.is_built() => renderer.static_build(self.scene.static_octree()),
            _ => Ok(()),
        }
    }

    fn update_skybox_camera(&mut self) {
        let Some(skybox) = &self.skybox else {
            return;
        };
        self.skybox_camera.copy_from(&self.camera);
        self.skybox_camera.set_scaled_projection(self.config.skybox_scale);
        self.skybox_camera.set_location(self.camera.location() - skybox.scene.world_offset());
    }

    fn render_picking_pass(&mut self) -> Result<()> {
        let Some(picker) = self.camera.picker() else {
            return Ok(());
        };
        let Some(framebuffer) = picker.framebuffer().cloned() else {
            return Err(Error::InvalidState("picking target was never sized".to_string()));
        };
        let shader = picker.shader().clone();

        let mut cmd = self.lock_renderer()?.create_command_list()?;
        cmd.begin()?;
        self.render_scenes_with_view(cmd.as_mut(), &framebuffer, Some(&shader), true)?;
        cmd.end()?;
        self.lock_renderer()?.submit(&[cmd.as_ref()])?;

        match self.camera.picker_mut() {
            Some(picker) => picker.finish(),
            None => Ok(()),
        }
    }

    fn dispatch_picks(&mut self) {
        while let Ok(response) = self.pick_receiver.try_recv() {
            let node = self.scene.node_for_pick_id(response.pixel_info.object_id);
            let Some(selection) = &mut self.selection else {
                continue;
            };
            let mut context = PickContext { scene: &self.scene, selection };
            self.viewer.on_picked(&mut context, node, response.intent);
        }
    }

    fn render_main_pass(&mut self) -> Result<()> {
        let framebuffer = self.lock_renderer()?.main_framebuffer();
        let debug_shader = self.camera.picker().and_then(|p| p.debug_shader()).cloned();

        let mut cmd = self.lock_renderer()?.create_command_list()?;
        cmd.begin()?;
        self.render_scenes_with_view(cmd.as_mut(), &framebuffer, debug_shader.as_ref(), false)?;

        // Overlays use the whole depth range.
        cmd.set_viewport(Viewport::covering(framebuffer.as_ref()))?;
        if let Some(selection) = &mut self.selection {
            selection.render(cmd.as_mut(), &self.scene)?;
        }
        let flags = self.controls.flags;
        if flags.contains(ViewerFlags::STATIC_OCTREE) {
            if let Some(renderer) = &mut self.static_octree_renderer {
                renderer.render(cmd.as_mut(), self.scene.static_octree())?;
            }
        }
        if flags.contains(ViewerFlags::DYNAMIC_OCTREE) {
            if let Some(renderer) = &mut self.dynamic_octree_renderer {
                renderer.render(cmd.as_mut(), self.scene.dynamic_octree())?;
            }
        }
        if flags.contains(ViewerFlags::GRID) {
            if let Some(grid) = &self.grid {
                grid.render(cmd.as_mut())?;
            }
        }

        cmd.end()?;
        self.lock_renderer()?.submit(&[cmd.as_ref()])
    }

    /// The fixed draw sequence shared by the picking and visible passes.
    ///
    /// Foreground geometry uses the upper depth sub-range and the skybox the
    /// lower one, so a skybox fragment never wins a depth test against the
    /// foreground.
    fn render_scenes_with_view(
        &self,
        cmd: &mut dyn CommandList,
        framebuffer: &Arc<dyn Framebuffer>,
        replacement_shader: Option<&Arc<ShaderProgram>>,
        picking: bool,
    ) -> Result<()> {
        let Some(main_buffers) = &self.main_buffers else {
            return Err(Error::InvalidState("uniform buffers not allocated".to_string()));
        };
        let flags = self.controls.flags;
        let viewport = Viewport::covering(framebuffer.as_ref());
        let foreground = viewport.with_depth_range(self.depth_partition.foreground());
        let background = viewport.with_depth_range(self.depth_partition.skybox());

        cmd.bind_framebuffer(framebuffer)?;
        cmd.set_viewport(viewport)?;
        let color = if picking || self.scene.sky().is_some() {
            [0.0; 4]
        } else {
            self.config.background_color.to_array()
        };
        cmd.clear(ClearValue { color, depth: 0.0 })?;

        if flags.contains(ViewerFlags::WIREFRAME) {
            cmd.set_polygon_mode(PolygonMode::Line)?;
        }

        main_buffers.bind(cmd)?;
        for (index, (_, texture)) in self.reserved_textures.iter().enumerate() {
            cmd.bind_texture(RESERVED_TEXTURE_SLOT + index as u32, texture)?;
        }
        let context = RenderContext::new(&self.camera, framebuffer, &self.scene)
            .with_replacement_shader(replacement_shader);

        cmd.set_viewport(foreground)?;
        self.scene.render_opaque_layer(cmd, &context)?;

        cmd.set_viewport(background)?;
        if flags.contains(ViewerFlags::SKYBOX) {
            if let (Some(skybox), Some(skybox_buffers)) = (&self.skybox, &self.skybox_buffers) {
                skybox_buffers.bind(cmd)?;
                let skybox_context = RenderContext::new(&self.skybox_camera, framebuffer, &skybox.scene)
                    .with_replacement_shader(replacement_shader)
                    .with_pick_ids(false);
                skybox.scene.render_opaque_layer(cmd, &skybox_context)?;
                skybox.scene.render_translucent_layer(cmd, &skybox_context)?;
                main_buffers.bind(cmd)?;
            }
        }
        if !picking {
            if let Some(sky) = self.scene.sky() {
                sky.render(cmd, &context)?;
            }
        }

        cmd.set_viewport(foreground)?;
        self.scene.render_translucent_layer(cmd, &context)?;

        if flags.contains(ViewerFlags::WIREFRAME) {
            cmd.set_polygon_mode(PolygonMode::Fill)?;
        }
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn skybox_camera(&self) -> &Camera {
        &self.skybox_camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn skybox(&self) -> Option<&Skybox> {
        self.skybox.as_ref()
    }

    pub fn selection(&self) -> Option<&SelectedNodeRenderer> {
        self.selection.as_ref()
    }

    pub fn reserved_textures(&self) -> &[(String, Arc<Texture>)] {
        &self.reserved_textures
    }

    pub fn locked_frustum(&self) -> Option<&Frustum> {
        self.locked_frustum.as_ref()
    }

    pub fn uptime(&self) -> f32 {
        self.uptime
    }

    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    fn lock_renderer(&self) -> Result<MutexGuard<'_, dyn Renderer + 'static>> {
        self.renderer
            .lock()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn picking_callback(sender: Sender<PickingResponse>) -> PickingCallback {
    Box::new(move |response| {
        if sender.send(response).is_err() {
            viewer_debug!("viewer::Orchestrator", "Pick result dropped, receiver gone");
        }
    })
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
