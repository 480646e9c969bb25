use std::path::PathBuf;

use tracing::{error, info};

use crate::compile;
use crate::gpu::compute::ComputeProgram;

/// Single-owner slot for the compiled compute program.
///
/// The slot pairs the optional program with the draw-enabled flag so the two
/// can never disagree: a successful compile swaps the program in and enables
/// drawing, a failed compile disables drawing but leaves whatever program was
/// installed before untouched. The frame loop is the flag's only reader.
#[derive(Debug)]
pub(crate) struct ProgramSlot<P> {
    program: Option<P>,
    draw_enabled: bool,
}

impl<P> ProgramSlot<P> {
    pub fn new() -> Self {
        Self {
            program: None,
            draw_enabled: false,
        }
    }

    /// Replaces the owned program; the previous one is dropped here.
    pub fn install(&mut self, program: P) {
        self.program = Some(program);
        self.draw_enabled = true;
    }

    /// Disables dispatch after a failed compile, retaining the old program.
    pub fn invalidate(&mut self) {
        self.draw_enabled = false;
    }

    pub fn draw_enabled(&self) -> bool {
        self.draw_enabled
    }

    /// The installed program, regardless of the flag. Dispatch must check
    /// `draw_enabled` first.
    pub fn program(&self) -> Option<&P> {
        self.program.as_ref()
    }
}

/// Loads shader text from disk, compiles it, and owns the resulting program.
///
/// Invoked once at startup, again on Space, and optionally every N frames
/// when the auto-recompile interval is enabled. All failures are logged and
/// survive; the process never dies because of a broken shader file.
pub(crate) struct ReloadController {
    shader_path: PathBuf,
    slot: ProgramSlot<ComputeProgram>,
    frames_since_reload: u32,
}

impl ReloadController {
    pub fn new(shader_path: PathBuf) -> Self {
        Self {
            shader_path,
            slot: ProgramSlot::new(),
            frames_since_reload: 0,
        }
    }

    /// Attempts a full reload: read, compile, reflect, build, swap.
    ///
    /// Returns whether the attempt succeeded; on failure the previous
    /// program (if any) stays allocated but dispatch is gated off.
    pub fn reload(&mut self, device: &wgpu::Device, layout: &wgpu::PipelineLayout) -> bool {
        self.frames_since_reload = 0;

        let source = match std::fs::read_to_string(&self.shader_path) {
            Ok(source) => source,
            Err(err) => {
                error!(
                    path = %self.shader_path.display(),
                    error = %err,
                    "failed to read shader source; dispatch disabled"
                );
                self.slot.invalidate();
                return false;
            }
        };

        match compile::reflect(&source)
            .and_then(|info| ComputeProgram::new(device, layout, info))
        {
            Ok(program) => {
                info!(
                    path = %self.shader_path.display(),
                    workgroup_size = ?program.workgroup_size,
                    "compute shader compiled"
                );
                self.slot.install(program);
                true
            }
            Err(err) => {
                error!(
                    path = %self.shader_path.display(),
                    "compute shader rejected; dispatch disabled\n{err}"
                );
                self.slot.invalidate();
                false
            }
        }
    }

    /// Counts a rendered frame and reports whether the opt-in auto-recompile
    /// interval has elapsed. `interval == 0` means disabled.
    pub fn auto_reload_due(&mut self, interval: u32) -> bool {
        if interval == 0 {
            return false;
        }
        self.frames_since_reload = self.frames_since_reload.saturating_add(1);
        self.frames_since_reload >= interval
    }

    pub fn draw_enabled(&self) -> bool {
        self.slot.draw_enabled()
    }

    pub fn program(&self) -> Option<&ComputeProgram> {
        self.slot.program()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_starts_empty_and_disabled() {
        let slot: ProgramSlot<u32> = ProgramSlot::new();
        assert!(!slot.draw_enabled());
        assert!(slot.program().is_none());
    }

    #[test]
    fn install_enables_and_replaces() {
        let mut slot = ProgramSlot::new();
        slot.install(1u32);
        assert!(slot.draw_enabled());
        assert_eq!(slot.program(), Some(&1));

        slot.install(2);
        assert_eq!(slot.program(), Some(&2));
        assert!(slot.draw_enabled());
    }

    #[test]
    fn invalidate_disables_but_retains_program() {
        let mut slot = ProgramSlot::new();
        slot.install(7u32);
        slot.invalidate();
        assert!(!slot.draw_enabled());
        assert_eq!(slot.program(), Some(&7));
    }

    #[test]
    fn failing_then_succeeding_sequence_tracks_flag() {
        let mut slot = ProgramSlot::new();

        // Initial failure: nothing to dispatch, nothing installed.
        slot.invalidate();
        assert!(!slot.draw_enabled());
        assert!(slot.program().is_none());

        slot.install(3u32);
        assert!(slot.draw_enabled());

        slot.invalidate();
        assert!(!slot.draw_enabled());

        slot.install(4);
        assert!(slot.draw_enabled());
        assert_eq!(slot.program(), Some(&4));
    }

    #[test]
    fn auto_reload_interval_counts_frames() {
        let mut controller = ReloadController::new(PathBuf::from("unused.comp"));
        assert!(!controller.auto_reload_due(0));
        assert!(!controller.auto_reload_due(0));

        assert!(!controller.auto_reload_due(3));
        assert!(!controller.auto_reload_due(3));
        assert!(controller.auto_reload_due(3));
    }
}
