//! Super Breakout (Atari, 1978).
//!
//! The board is everything but the processor: a pixel-clocked raster
//! generator, a ball motion engine that works directly in display memory,
//! the playfield renderer, a tone generator, the paddle decoder and the I/O
//! block. [`SuperBreakoutBoard`] is the CPU's [`Bus`]; any 6502 core
//! implementing [`Cpu`] plugs into [`SuperBreakoutSystem`].
//!
//! Memory map (14 address lines decoded, A14/A15 ignored):
//!   0x0000-0x03FF  Work RAM, 128 bytes mirrored every 0x80
//!   0x0400-0x07FF  Display memory (playfield + motion registers)
//!   0x0800-0x0BFF  Read: input port, A0-A1 select
//!                    0 switches (active-low), 1 DIP bank,
//!                    2 status (bit 7 VBLANK, bit 6 128H), 3 paddle
//!   0x0C00-0x0FFF  Read: vertical counter
//!                  Write: 0x0C00-0x0C7F output latch, A4-A6 bit, A0 data
//!                         0x0C80-0x0CFF watchdog restart
//!                         0x0E00-0x0EFF IRQ acknowledge
//!   0x1000-0x27FF  Unmapped (open bus)
//!   0x2800-0x3FFF  Program ROM (6KB); 0xFFFA-0xFFFF vectors land here

pub mod audio;
pub mod display_memory;
pub mod io;
pub mod motion;
pub mod palette;
pub mod playfield;

use sbrkout_core::core::bus::InterruptState;
use sbrkout_core::core::machine::{InputButton, Machine};
use sbrkout_core::core::{Bus, BusMaster};
use sbrkout_core::cpu::Cpu;
use sbrkout_core::device::quadrature::{QuadratureDecoder, QuadratureEncoder};
use sbrkout_core::device::raster::{RasterGenerator, RasterPosition, RasterTiming, SyncSignals};

use crate::config::{BoardConfig, DipSwitches};
use crate::rom_loader::{RomEntry, RomLoadError, RomRegion, RomSet};

use audio::{AUDIO_SAMPLE_RATE, ToneSynth};
use display_memory::DisplayMemory;
use io::{BoardOutputs, IoPorts, Switch};
use motion::{MotionEngine, MotionEvents};

// ---------------------------------------------------------------------------
// ROM definitions
// ---------------------------------------------------------------------------

pub const ROM_SIZE: usize = 0x1800;
const ROM_BASE: u16 = 0x2800;
/// 0xFFFC through the 14-bit decode.
const RESET_VECTOR_OFFSET: usize = 0x17FC;

/// Program ROM: three 2KB EPROMs at 0x2800-0x3FFF. Dumps vary between
/// board revisions, so checksums are not enforced.
pub static SUPER_BREAKOUT_ROM: RomRegion = RomRegion {
    size: ROM_SIZE,
    entries: &[
        RomEntry {
            name: "033453.c1",
            size: 0x0800,
            offset: 0x0000,
            crc32: &[],
        },
        RomEntry {
            name: "033454.d1",
            size: 0x0800,
            offset: 0x0800,
            crc32: &[],
        },
        RomEntry {
            name: "033455.e1",
            size: 0x0800,
            offset: 0x1000,
            crc32: &[],
        },
    ],
};

// ---------------------------------------------------------------------------
// Input button IDs
// ---------------------------------------------------------------------------
pub const INPUT_COIN: u8 = 0;
pub const INPUT_START1: u8 = 1;
pub const INPUT_START2: u8 = 2;
pub const INPUT_SERVE: u8 = 3;
pub const INPUT_SELECT1: u8 = 4;
pub const INPUT_SELECT2: u8 = 5;
pub const INPUT_TEST: u8 = 6;
pub const INPUT_SLAM: u8 = 7;
pub const INPUT_PADDLE_LEFT: u8 = 8;
pub const INPUT_PADDLE_RIGHT: u8 = 9;

const SUPER_BREAKOUT_INPUT_MAP: &[InputButton] = &[
    InputButton { id: INPUT_COIN, name: "Coin" },
    InputButton { id: INPUT_START1, name: "P1 Start" },
    InputButton { id: INPUT_START2, name: "P2 Start" },
    InputButton { id: INPUT_SERVE, name: "Serve" },
    InputButton { id: INPUT_SELECT1, name: "Game Select 1" },
    InputButton { id: INPUT_SELECT2, name: "Game Select 2" },
    InputButton { id: INPUT_TEST, name: "Self Test" },
    InputButton { id: INPUT_SLAM, name: "Slam" },
    InputButton { id: INPUT_PADDLE_LEFT, name: "Paddle Left" },
    InputButton { id: INPUT_PADDLE_RIGHT, name: "Paddle Right" },
];

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------
// Master clock: 12.096 MHz XTAL
// Pixel clock: 12.096 MHz / 2 = 6.048 MHz
// CPU clock: pixel clock / 8 = 756 kHz, 48 cycles per scanline
// HTOTAL 384, VTOTAL 262: 6.048 MHz / (384 * 262) ≈ 60.1 Hz
pub const SUPER_BREAKOUT_TIMING: RasterTiming = RasterTiming {
    h_total: 384,
    h_active: 256,
    h_sync_start: 280,
    h_sync_end: 312,
    v_total: 262,
    v_active: 224,
    v_sync_start: 240,
    v_sync_end: 244,
};

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 224;
pub const TICKS_PER_FRAME: u32 = SUPER_BREAKOUT_TIMING.ticks_per_frame();

const PIXELS_PER_CPU_CYCLE: u16 = 8;
/// Motion runs as horizontal blank begins.
const MOTION_H: u16 = 256;
/// VBLANK edges without a watchdog restart before the board resets.
pub const WATCHDOG_FRAMES: u8 = 8;

const WORK_RAM_SIZE: usize = 0x80;
const PADDLE_CENTER: u8 = 128;

/// Video signal for one pixel clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VideoOutput {
    pub position: RasterPosition,
    /// Ball, paddle or brick at this position. Always false in blanking.
    pub pixel: bool,
    /// Color-overlay tint for this column, when enabled and in the active window.
    pub color: Option<(u8, u8, u8)>,
    pub sync: SyncSignals,
}

/// What the board asks of its owner after one pixel clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoardTick {
    /// The CPU gets a bus cycle on this pixel clock.
    pub cpu_cycle: bool,
    /// The watchdog ran out; the whole system must be reset.
    pub watchdog_expired: bool,
    pub motion: MotionEvents,
}

pub struct SuperBreakoutBoard {
    config: BoardConfig,
    raster: RasterGenerator,

    // Memory
    ram: [u8; WORK_RAM_SIZE],
    display: DisplayMemory,
    rom: [u8; ROM_SIZE],

    io: IoPorts,
    motion: MotionEngine,
    synth: ToneSynth,

    // Paddle: decoder plus the phase generator for digital left/right
    paddle: QuadratureDecoder,
    paddle_drive: QuadratureEncoder,
    paddle_left_held: bool,
    paddle_right_held: bool,
    paddle_lines: u16,

    irq: bool,
    nmi: bool,
    watchdog_frames: u8,

    // Last value driven on the data bus, returned by unmapped reads
    open_bus: u8,

    frame: Vec<u8>,
}

impl SuperBreakoutBoard {
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Self {
        Self {
            io: IoPorts::new(config.dip.to_byte()),
            config,
            raster: RasterGenerator::new(SUPER_BREAKOUT_TIMING),
            ram: [0; WORK_RAM_SIZE],
            display: DisplayMemory::new(),
            rom: [0; ROM_SIZE],
            motion: MotionEngine::new(),
            synth: ToneSynth::new(),
            paddle: QuadratureDecoder::new(0, 255, PADDLE_CENTER),
            paddle_drive: QuadratureEncoder::new(),
            paddle_left_held: false,
            paddle_right_held: false,
            paddle_lines: 0,
            irq: false,
            nmi: false,
            watchdog_frames: 0,
            open_bus: 0,
            frame: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    /// Return every counter, latch and memory to power-on state. ROM,
    /// configuration and held inputs are untouched.
    pub fn reset(&mut self) {
        self.raster.reset();
        self.ram.fill(0);
        self.display.reset();
        self.io.reset();
        self.motion.reset(self.io.switches.is_closed(Switch::Serve));
        self.synth.reset();
        self.paddle.reset();
        self.paddle_drive.reset();
        self.paddle_lines = 0;
        self.irq = false;
        self.nmi = false;
        self.watchdog_frames = 0;
        self.open_bus = 0;
        self.frame.fill(0);
    }

    /// Address the CPU starts at: the little-endian word at 0xFFFC.
    pub fn reset_vector(&self) -> u16 {
        u16::from_le_bytes([
            self.rom[RESET_VECTOR_OFFSET],
            self.rom[RESET_VECTOR_OFFSET + 1],
        ])
    }

    // -- Per-tick hardware -------------------------------------------------

    /// Advance one pixel clock: raster, interrupt sources, paddle, serve,
    /// motion and audio, in that order. The CPU cycle and video output for
    /// the same clock follow, driven by the owner.
    pub fn clock_pixel(&mut self) -> BoardTick {
        let events = self.raster.advance_tick();
        let pos = self.raster.position();
        let mut tick = BoardTick::default();

        // Interrupt sources
        if events.frame_start {
            self.nmi = false;
        }
        if events.line_start && pos.v % 32 == 16 {
            self.irq = true;
        }
        if events.vblank_edge {
            if !self.io.nmi_masked() {
                self.nmi = true;
            }
            if self.config.paddle_recenter {
                self.paddle.reset();
                self.paddle_drive.reset();
            }
            tick.watchdog_expired = self.clock_watchdog();
        }

        if events.line_start {
            self.clock_paddle_drive();
        }

        let serve = self.io.switches.is_closed(Switch::Serve);
        self.motion.serve(&mut self.display, serve);

        if pos.h == MOTION_H {
            let paddle = self.paddle.position();
            tick.motion = self.motion.clock_scanline(&mut self.display, pos.v, paddle);
            if tick.motion.tone_trigger {
                self.synth.trigger(self.display.tone_select());
            }
        }

        if events.line_start {
            self.synth.clock(pos.v);
        }

        tick.cpu_cycle = pos.h.is_multiple_of(PIXELS_PER_CPU_CYCLE);
        tick
    }

    fn clock_watchdog(&mut self) -> bool {
        self.watchdog_frames = self.watchdog_frames.saturating_add(1);
        if self.watchdog_frames < WATCHDOG_FRAMES || !self.config.watchdog {
            return false;
        }
        log::warn!("watchdog expired after {WATCHDOG_FRAMES} frames without restart");
        true
    }

    /// Step the paddle one quadrature edge every `paddle_step_lines`
    /// scanlines while exactly one direction is held.
    fn clock_paddle_drive(&mut self) {
        if self.paddle_left_held == self.paddle_right_held {
            self.paddle_lines = 0;
            return;
        }
        self.paddle_lines += 1;
        if self.paddle_lines < self.config.paddle_step_lines.max(1) {
            return;
        }
        self.paddle_lines = 0;
        let (a, b) = self.paddle_drive.advance(self.paddle_right_held);
        self.paddle.input(a, b);
    }

    /// Sample the video signal at the current position and latch it into
    /// the frame buffer.
    pub fn output_pixel(&mut self) -> VideoOutput {
        let pos = self.raster.position();
        let active = self.raster.in_active_window();
        let pixel = active
            && (playfield::brick_at(&self.display, pos, &SUPER_BREAKOUT_TIMING)
                || MotionEngine::ball_at(&self.display, pos)
                || MotionEngine::paddle_at(&self.display, pos, self.paddle.position()));
        if active {
            self.frame[pos.v as usize * SCREEN_WIDTH + pos.h as usize] = u8::from(pixel);
        }
        VideoOutput {
            position: pos,
            pixel,
            color: if active && self.config.color_overlay {
                palette::band_color(pos.h)
            } else {
                None
            },
            sync: self.raster.sync(),
        }
    }

    // -- Bus helpers -------------------------------------------------------

    fn status_byte(&self) -> u8 {
        let pos = self.raster.position();
        let sync = self.raster.sync();
        let mut status = 0x3F;
        if sync.v_blank {
            status |= 0x80;
        }
        if (128..256).contains(&pos.h) {
            status |= 0x40;
        }
        status
    }

    fn read_input_port(&self, addr: u16) -> u8 {
        match addr & 3 {
            0 => self.io.switches.to_port_byte(),
            1 => self.io.dip,
            2 => self.status_byte(),
            _ => self.paddle.position(),
        }
    }

    fn write_control(&mut self, addr: u16) {
        match addr {
            0x0C00..=0x0C7F => {
                self.io.write_latch(addr);
                if self.io.nmi_masked() {
                    self.nmi = false;
                }
            }
            0x0C80..=0x0CFF => self.watchdog_frames = 0,
            0x0E00..=0x0EFF => {
                log::trace!("IRQ acknowledged at v={}", self.raster.position().v);
                self.irq = false;
            }
            _ => {}
        }
    }

    // -- ROM loading -------------------------------------------------------

    pub fn load_rom_set(&mut self, rom_set: &RomSet) -> Result<(), RomLoadError> {
        let rom_data = SUPER_BREAKOUT_ROM.load(rom_set)?;
        self.rom.copy_from_slice(&rom_data);
        log::info!(
            "program ROM loaded, reset vector {:#06X}",
            self.reset_vector()
        );
        Ok(())
    }

    /// Byte-stream loader. `addr` is the offset into program ROM; bytes
    /// beyond it, or with the strobe low, are dropped.
    pub fn load_rom_byte(&mut self, addr: u16, data: u8, strobe: bool) {
        if !strobe {
            return;
        }
        match self.rom.get_mut(addr as usize) {
            Some(byte) => *byte = data,
            None => log::trace!("loader byte at {addr:#06X} outside program ROM, ignored"),
        }
    }

    // -- Inputs ------------------------------------------------------------

    pub fn set_switch(&mut self, switch: Switch, closed: bool) {
        self.io.switches.set(switch, closed);
    }

    pub fn set_paddle_buttons(&mut self, left: bool, right: bool) {
        self.paddle_left_held = left;
        self.paddle_right_held = right;
    }

    /// Feed the paddle's A/B lines directly, for a real encoder.
    pub fn set_quadrature(&mut self, a: bool, b: bool) {
        self.paddle.input(a, b);
    }

    pub fn set_dip(&mut self, byte: u8) {
        self.io.dip = byte;
        self.config.dip = DipSwitches::from_byte(byte);
    }

    pub fn set_dip_switches(&mut self, dip: DipSwitches) {
        self.set_dip(dip.to_byte());
    }

    // -- Observers ---------------------------------------------------------

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn dip_switches(&self) -> DipSwitches {
        DipSwitches::from_byte(self.io.dip)
    }

    pub fn raster_position(&self) -> RasterPosition {
        self.raster.position()
    }

    pub fn sync(&self) -> SyncSignals {
        self.raster.sync()
    }

    pub fn display_memory(&self) -> &DisplayMemory {
        &self.display
    }

    pub fn display_memory_mut(&mut self) -> &mut DisplayMemory {
        &mut self.display
    }

    pub fn paddle_position(&self) -> u8 {
        self.paddle.position()
    }

    pub fn outputs(&self) -> BoardOutputs {
        self.io.outputs()
    }

    pub fn coin_counter_pulses(&self) -> u32 {
        self.io.coin_counter_pulses()
    }

    pub fn read_rom(&self, offset: usize) -> u8 {
        self.rom.get(offset).copied().unwrap_or(0)
    }

    pub fn irq_pending(&self) -> bool {
        self.irq
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi
    }

    pub fn tone_active(&self) -> bool {
        self.synth.is_active()
    }

    pub fn drain_audio(&mut self) -> Vec<i16> {
        self.synth.drain()
    }

    /// Latched frame, one byte per visible pixel (1 = lit), row-major.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn render_frame(&self, buffer: &mut [u8]) {
        for (i, &lit) in self.frame.iter().enumerate() {
            let (r, g, b) = if lit == 0 {
                (0, 0, 0)
            } else if self.config.color_overlay {
                palette::band_color((i % SCREEN_WIDTH) as u16).unwrap_or(palette::WHITE)
            } else {
                palette::WHITE
            };
            let offset = i * 3;
            buffer[offset] = r;
            buffer[offset + 1] = g;
            buffer[offset + 2] = b;
        }
    }
}

impl Default for SuperBreakoutBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SuperBreakoutBoard {
    type Address = u16;
    type Data = u8;

    fn is_halted_for(&self, _master: BusMaster) -> bool {
        false // No DMA
    }

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;

        let data = match addr {
            0x0000..=0x03FF => self.ram[addr as usize & (WORK_RAM_SIZE - 1)],
            0x0400..=0x07FF => self.display.read(addr - 0x0400),
            0x0800..=0x0BFF => self.read_input_port(addr),
            // Eight-bit counter: lines 256-261 read back as 0-5
            0x0C00..=0x0FFF => self.raster.position().v as u8,
            0x2800..=0x3FFF => self.rom[(addr - ROM_BASE) as usize],
            _ => self.open_bus,
        };

        self.open_bus = data;
        data
    }

    fn write(&mut self, master: BusMaster, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;
        self.open_bus = data;

        match addr {
            0x0000..=0x03FF => self.ram[addr as usize & (WORK_RAM_SIZE - 1)] = data,
            0x0400..=0x07FF => self.display.write(addr - 0x0400, data),
            0x0C00..=0x0FFF => self.write_control(addr),
            // Write-protected for the CPU; the loader may fill it
            0x2800..=0x3FFF if master == BusMaster::Loader => {
                self.rom[(addr - ROM_BASE) as usize] = data;
            }
            _ => {}
        }
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        InterruptState {
            nmi: self.nmi && !self.io.nmi_masked(),
            irq: self.irq,
        }
    }
}

// ---------------------------------------------------------------------------
// System: board + CPU
// ---------------------------------------------------------------------------

/// The complete game: the board and a 6502 core wired to it.
pub struct SuperBreakoutSystem<C> {
    cpu: C,
    board: SuperBreakoutBoard,
}

impl<C> SuperBreakoutSystem<C>
where
    C: Cpu<Bus = dyn Bus<Address = u16, Data = u8>>,
{
    pub fn new(cpu: C) -> Self {
        Self::with_config(cpu, BoardConfig::default())
    }

    pub fn with_config(cpu: C, config: BoardConfig) -> Self {
        Self {
            cpu,
            board: SuperBreakoutBoard::with_config(config),
        }
    }

    /// One pixel clock of the whole system.
    pub fn tick(&mut self) -> VideoOutput {
        let tick = self.board.clock_pixel();

        if tick.cpu_cycle {
            let master = BusMaster::Cpu(0);
            self.cpu.signal_interrupt(self.board.check_interrupts(master));
            if !self.board.is_halted_for(master) {
                self.cpu.tick_with_bus(&mut self.board, master);
            }
        }

        let video = self.board.output_pixel();
        if tick.watchdog_expired {
            self.reset();
        }
        video
    }

    pub fn load_rom_set(&mut self, rom_set: &RomSet) -> Result<(), RomLoadError> {
        self.board.load_rom_set(rom_set)
    }

    pub fn load_rom_byte(&mut self, addr: u16, data: u8, strobe: bool) {
        self.board.load_rom_byte(addr, data, strobe);
    }

    pub fn set_quadrature(&mut self, a: bool, b: bool) {
        self.board.set_quadrature(a, b);
    }

    pub fn outputs(&self) -> BoardOutputs {
        self.board.outputs()
    }

    pub fn board(&self) -> &SuperBreakoutBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut SuperBreakoutBoard {
        &mut self.board
    }

    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    fn update_paddle_buttons(&mut self, button: u8, pressed: bool) {
        let (mut left, mut right) = (
            self.board.paddle_left_held,
            self.board.paddle_right_held,
        );
        if button == INPUT_PADDLE_LEFT {
            left = pressed;
        } else {
            right = pressed;
        }
        self.board.set_paddle_buttons(left, right);
    }
}

impl<C> Machine for SuperBreakoutSystem<C>
where
    C: Cpu<Bus = dyn Bus<Address = u16, Data = u8>>,
{
    fn display_size(&self) -> (u32, u32) {
        (SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)
    }

    fn run_frame(&mut self) {
        for _ in 0..TICKS_PER_FRAME {
            self.tick();
        }
    }

    fn render_frame(&self, buffer: &mut [u8]) {
        self.board.render_frame(buffer);
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        let switch = match button {
            INPUT_COIN => Switch::Coin,
            INPUT_START1 => Switch::Start1,
            INPUT_START2 => Switch::Start2,
            INPUT_SERVE => Switch::Serve,
            INPUT_SELECT1 => Switch::Select1,
            INPUT_SELECT2 => Switch::Select2,
            INPUT_TEST => Switch::Test,
            INPUT_SLAM => Switch::Slam,
            INPUT_PADDLE_LEFT | INPUT_PADDLE_RIGHT => {
                self.update_paddle_buttons(button, pressed);
                return;
            }
            _ => return,
        };
        self.board.set_switch(switch, pressed);
    }

    fn input_map(&self) -> &[InputButton] {
        SUPER_BREAKOUT_INPUT_MAP
    }

    fn reset(&mut self) {
        self.board.reset();
        self.cpu.reset();
        let vector = self.board.reset_vector();
        self.cpu.set_pc(vector);
        log::info!("system reset, PC={vector:#06X}");
    }

    fn audio_sample_rate(&self) -> u32 {
        AUDIO_SAMPLE_RATE
    }

    fn drain_audio(&mut self) -> Vec<i16> {
        self.board.drain_audio()
    }
}
