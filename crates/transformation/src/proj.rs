//! [`Engine`] backed by the PROJ C library.
//!
//! Every stage owns its own PROJ thread context. PROJ objects must not be
//! used from two threads at once, so a stage serializes calls through a
//! mutex; distinct stages run in parallel.

use libc::{c_char, c_int};
use std::ffi::{CStr, CString};
use std::path::Path;
use std::ptr::NonNull;
use std::sync::{Mutex, PoisonError};

use tracing::info;
use webproj_common::{AreaOfInterest, CrsId};

use crate::engine::{Engine, EngineError, Stage};

#[cfg(windows)]
const SEARCH_PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
const SEARCH_PATH_SEPARATOR: char = ':';

/// PROJ thread context.
struct Context(NonNull<proj_sys::PJ_CONTEXT>);

impl Context {
    fn new() -> Result<Self, EngineError> {
        let ptr = unsafe { proj_sys::proj_context_create() };
        NonNull::new(ptr)
            .map(Context)
            .ok_or_else(|| EngineError::Init("proj_context_create returned null".to_string()))
    }

    fn as_ptr(&self) -> *mut proj_sys::PJ_CONTEXT {
        self.0.as_ptr()
    }

    fn set_search_paths(&self, paths: &[CString]) {
        let ptrs: Vec<*const c_char> = paths.iter().map(|p| p.as_ptr()).collect();
        unsafe {
            proj_sys::proj_context_set_search_paths(
                self.as_ptr(),
                ptrs.len() as c_int,
                ptrs.as_ptr(),
            )
        };
    }

    /// Message for the last error raised on this context.
    fn last_error(&self) -> String {
        unsafe {
            let errno = proj_sys::proj_context_errno(self.as_ptr());
            c_string(proj_sys::proj_context_errno_string(self.as_ptr(), errno))
        }
        .unwrap_or_else(|| "unknown PROJ error".to_string())
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe { proj_sys::proj_context_destroy(self.as_ptr()) };
    }
}

/// A PJ object together with the context it was created in.
struct Handles {
    pj: NonNull<proj_sys::PJ>,
    // Dropped after `pj` is destroyed.
    #[allow(dead_code)]
    ctx: Context,
}

// SAFETY: the context and PJ are owned exclusively by `Handles` and are only
// touched while the owning stage's mutex is held.
unsafe impl Send for Handles {}

impl Drop for Handles {
    fn drop(&mut self) {
        unsafe { proj_sys::proj_destroy(self.pj.as_ptr()) };
    }
}

/// A single PROJ transformation.
pub struct ProjStage {
    handles: Mutex<Handles>,
}

impl ProjStage {
    fn new(ctx: Context, pj: *mut proj_sys::PJ) -> Result<Self, EngineError> {
        match NonNull::new(pj) {
            Some(pj) => Ok(Self {
                handles: Mutex::new(Handles { pj, ctx }),
            }),
            None => Err(EngineError::Create(ctx.last_error())),
        }
    }
}

impl Stage for ProjStage {
    fn transform(&self, components: &[f64]) -> Vec<f64> {
        let get = |i: usize| components.get(i).copied();
        // PROJ reads an unset time as HUGE_VAL.
        let input = proj_sys::PJ_COORD {
            xyzt: proj_sys::PJ_XYZT {
                x: get(0).unwrap_or(f64::INFINITY),
                y: get(1).unwrap_or(f64::INFINITY),
                z: get(2).unwrap_or(0.0),
                t: get(3).unwrap_or(f64::INFINITY),
            },
        };

        let handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        let output = unsafe {
            proj_sys::proj_errno_reset(handles.pj.as_ptr());
            let out = proj_sys::proj_trans(
                handles.pj.as_ptr(),
                proj_sys::PJ_DIRECTION_PJ_FWD,
                input,
            );
            out.xyzt
        };

        [output.x, output.y, output.z, output.t]
            .into_iter()
            .take(components.len())
            .collect()
    }
}

/// Engine creating [`ProjStage`]s.
pub struct ProjEngine {
    search_paths: Vec<CString>,
}

impl ProjEngine {
    /// Engine using PROJ's default resource search path.
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
        }
    }

    /// Engine that also searches `data_dir` for init files and grids,
    /// after PROJ's default locations.
    pub fn with_data_dir(data_dir: &Path) -> Result<Self, EngineError> {
        let mut paths = default_search_paths();
        paths.push(data_dir.display().to_string());
        info!(search_paths = ?paths, "Configured PROJ search paths");

        let search_paths = paths
            .into_iter()
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { search_paths })
    }

    /// PROJ library version, e.g. "9.4.0".
    pub fn version() -> String {
        let info = unsafe { proj_sys::proj_info() };
        format!("{}.{}.{}", info.major, info.minor, info.patch)
    }

    fn context(&self) -> Result<Context, EngineError> {
        let ctx = Context::new()?;
        if !self.search_paths.is_empty() {
            ctx.set_search_paths(&self.search_paths);
        }
        Ok(ctx)
    }
}

impl Default for ProjEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for ProjEngine {
    fn from_pipeline(&self, definition: &str) -> Result<Box<dyn Stage>, EngineError> {
        let definition = CString::new(definition)?;
        let ctx = self.context()?;
        let pj = unsafe { proj_sys::proj_create(ctx.as_ptr(), definition.as_ptr()) };
        Ok(Box::new(ProjStage::new(ctx, pj)?))
    }

    fn from_crs_pair(
        &self,
        src: &CrsId,
        dst: &CrsId,
        area: &AreaOfInterest,
    ) -> Result<Box<dyn Stage>, EngineError> {
        let src = CString::new(src.as_str())?;
        let dst = CString::new(dst.as_str())?;
        let ctx = self.context()?;

        let pj = unsafe {
            let pj_area = proj_sys::proj_area_create();
            proj_sys::proj_area_set_bbox(pj_area, area.west, area.south, area.east, area.north);
            let pj = proj_sys::proj_create_crs_to_crs(
                ctx.as_ptr(),
                src.as_ptr(),
                dst.as_ptr(),
                pj_area,
            );
            proj_sys::proj_area_destroy(pj_area);
            pj
        };
        Ok(Box::new(ProjStage::new(ctx, pj)?))
    }
}

/// PROJ's built-in search path, in lookup order.
fn default_search_paths() -> Vec<String> {
    let info = unsafe { proj_sys::proj_info() };
    unsafe { c_string(info.searchpath) }
        .map(|joined| {
            joined
                .split(SEARCH_PATH_SEPARATOR)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// # Safety
///
/// `ptr` must be null or point to a nul-terminated string.
unsafe fn c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}
