//! Hardware teardown and reset for the path where the OS is already gone:
//! the scheduler is stopped, interrupts are (about to be) masked, and the
//! only remaining job is to put every subsystem back into its cold-reset
//! state and pull the reset lines.

use fugit::MillisDurationU32;

use crate::{
    hal::{Cpu, SystemControl},
    soc::*,
};

/// Safety-net watchdog period. If any teardown step hangs, this fires and
/// hard-resets the chip instead.
const GUARD_TIMEOUT: MillisDurationU32 = MillisDurationU32::secs(1);

/// UART controllers whose TX FIFOs are flushed before reset.
const UART_PORTS: u8 = 3;

/// Input-select value the ROM expects on the flash signal routing; the
/// second-stage bootloader may have repointed these.
const ROM_DEFAULT_IN_SEL: u32 = 0x30;
const FLASH_IN_SEL_SIGNALS: u32 = 6;

/// States of the teardown machine, traversed in order exactly once. Each
/// state is a precondition for the next; there is no rollback, and the
/// terminal state is unobservable because the hardware resets underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartStage {
    InterruptsMasked,
    GuardWatchdogArmed,
    PeerCoreHalted,
    SharedBusQuiesced,
    TimerWatchdogsDisabled,
    SerialDrained,
    CachesDisabled,
    PinRoutingRestored,
    SubsystemsReset,
    ClocksReset,
    CoresReset,
}

impl RestartStage {
    pub const SEQUENCE: [RestartStage; 11] = [
        RestartStage::InterruptsMasked,
        RestartStage::GuardWatchdogArmed,
        RestartStage::PeerCoreHalted,
        RestartStage::SharedBusQuiesced,
        RestartStage::TimerWatchdogsDisabled,
        RestartStage::SerialDrained,
        RestartStage::CachesDisabled,
        RestartStage::PinRoutingRestored,
        RestartStage::SubsystemsReset,
        RestartStage::ClocksReset,
        RestartStage::CoresReset,
    ];
}

/// Runs the ordered no-OS restart sequence over an owned hardware handle.
///
/// Non-reentrant and non-cancelable by construction: it consumes the handle,
/// takes no locks (no other code is scheduled to release one), and never
/// returns. Must only be entered once the scheduler and interrupts on the
/// running core are already stopped.
pub struct RestartSequencer<H: SystemControl> {
    hal: H,
}

impl<H: SystemControl> RestartSequencer<H> {
    pub fn new(hal: H) -> Self {
        Self { hal }
    }

    /// Tears the hardware down and resets both cores. Any step that hangs is
    /// covered by the guard watchdog armed at the start of the sequence.
    pub fn restart(mut self) -> ! {
        let core = self.hal.current_core();
        self.run(core);
        self.hal.halt()
    }

    fn run(&mut self, core: Cpu) {
        for stage in RestartStage::SEQUENCE {
            self.advance(stage, core);
        }
    }

    fn advance(&mut self, stage: RestartStage, core: Cpu) {
        match stage {
            RestartStage::InterruptsMasked => self.hal.mask_interrupts(),
            RestartStage::GuardWatchdogArmed => self.arm_guard_watchdog(),
            RestartStage::PeerCoreHalted => self.halt_peer(core),
            RestartStage::SharedBusQuiesced => self.hal.abort_shared_bus_access(),
            RestartStage::TimerWatchdogsDisabled => self.disable_timer_watchdogs(),
            RestartStage::SerialDrained => self.drain_serial(),
            RestartStage::CachesDisabled => self.disable_caches(),
            RestartStage::PinRoutingRestored => self.restore_pin_routing(),
            RestartStage::SubsystemsReset => self.reset_subsystems(),
            RestartStage::ClocksReset => self.hal.set_cpu_clock_to_xtal(),
            RestartStage::CoresReset => self.reset_cores(core),
        }
    }

    /// Arms the RTC watchdog: stage 0 resets the system, stage 1 resets the
    /// RTC as well. Deliberately never disarmed afterwards; it is the last
    /// line of defense if a later stage wedges the chip.
    fn arm_guard_watchdog(&mut self) {
        let ticks = (self.hal.slow_clock_hz() as u64 * GUARD_TIMEOUT.to_millis() as u64
            / 1000) as u32;

        self.hal.write_reg(RTC_CNTL_WDTWPROTECT_REG, RTC_CNTL_WDT_WKEY_VALUE);
        self.hal.write_reg(
            RTC_CNTL_WDTCONFIG0_REG,
            RTC_CNTL_WDT_FLASHBOOT_MOD_EN
                | (RTC_WDT_STG_SEL_RESET_SYSTEM << RTC_CNTL_WDT_STG0_S)
                | (RTC_WDT_STG_SEL_RESET_RTC << RTC_CNTL_WDT_STG1_S)
                | (1 << RTC_CNTL_WDT_SYS_RESET_LENGTH_S)
                | (1 << RTC_CNTL_WDT_CPU_RESET_LENGTH_S),
        );
        self.hal.write_reg(RTC_CNTL_WDTCONFIG1_REG, ticks);
    }

    /// Reset, then stall, the core that is not running this sequence.
    ///
    /// Reset must precede stall: the peer may be mid-`s32c1i`, and stalling
    /// it there leaves the shared memory pool locked by the arbiter against
    /// the running core.
    fn halt_peer(&mut self, core: Cpu) {
        let peer = core.other();
        self.hal.reset_core(peer);
        self.hal.stall_core(peer);
    }

    /// Timer-group watchdogs are independent of the RTC one and would fire
    /// during teardown; unlock, disable, relock each group.
    fn disable_timer_watchdogs(&mut self) {
        for group in [DR_REG_TIMERGROUP0_BASE, DR_REG_TIMERGROUP1_BASE] {
            self.hal
                .write_reg(group + TIMG_WDTWPROTECT_OFFSET, TIMG_WDT_WKEY_VALUE);
            self.hal.clear_bits(group + TIMG_WDTCONFIG0_OFFSET, TIMG_WDT_EN);
            self.hal.write_reg(group + TIMG_WDTWPROTECT_OFFSET, 0);
        }
    }

    fn drain_serial(&mut self) {
        for uart in 0..UART_PORTS {
            self.hal.drain_tx(uart);
        }
    }

    fn disable_caches(&mut self) {
        self.hal.disable_cache(Cpu::Pro);
        self.hal.disable_cache(Cpu::App);
    }

    fn restore_pin_routing(&mut self) {
        for signal in 0..FLASH_IN_SEL_SIGNALS {
            self.hal.write_reg(
                GPIO_FUNC0_IN_SEL_CFG_REG + signal * GPIO_FUNC_IN_SEL_CFG_STRIDE,
                ROM_DEFAULT_IN_SEL,
            );
        }
    }

    /// Pulse the reset lines of the radio, coexistence and host-controller
    /// blocks, then the timer/SPI/UART peripherals: assert the whole set,
    /// then release it.
    fn reset_subsystems(&mut self) {
        self.hal.set_bits(
            DPORT_CORE_RST_EN_REG,
            DPORT_BB_RST
                | DPORT_FE_RST
                | DPORT_MAC_RST
                | DPORT_BT_RST
                | DPORT_BTMAC_RST
                | DPORT_SDIO_RST
                | DPORT_SDIO_HOST_RST
                | DPORT_EMAC_RST
                | DPORT_MACPWR_RST
                | DPORT_RW_BTMAC_RST
                | DPORT_RW_BTLP_RST,
        );
        self.hal.write_reg(DPORT_CORE_RST_EN_REG, 0);

        self.hal.set_bits(
            DPORT_PERIP_RST_EN_REG,
            DPORT_TIMERS_RST | DPORT_SPI01_RST | DPORT_UART_RST,
        );
        self.hal.write_reg(DPORT_PERIP_RST_EN_REG, 0);
    }

    /// Clear the APP CPU entry point so it cannot resume stale code, then
    /// reset both cores. The running core goes last; when APP is the one
    /// running, PRO must also be unstalled between its reset and ours so it
    /// starts up instead of sitting stalled.
    fn reset_cores(&mut self, core: Cpu) {
        self.hal.write_reg(DPORT_APPCPU_CTRL_D_REG, 0);

        match core {
            Cpu::Pro => {
                self.hal.reset_core(Cpu::App);
                self.hal.reset_core(Cpu::Pro);
            }
            Cpu::App => {
                self.hal.reset_core(Cpu::Pro);
                self.hal.unstall_core(Cpu::Pro);
                self.hal.reset_core(Cpu::App);
            }
        }
    }
}

/// Stops the RTC watchdog from the panic handler so a paused system can be
/// inspected without the watchdog rebooting it mid-dump.
pub fn panic_watchdog_stop<H: crate::hal::RegisterBus>(hal: &mut H) {
    hal.write_reg(RTC_CNTL_WDTWPROTECT_REG, RTC_CNTL_WDT_WKEY_VALUE);
    hal.write_reg(RTC_CNTL_WDTFEED_REG, 1);

    let config = hal.read_reg(RTC_CNTL_WDTCONFIG0_REG);
    hal.write_reg(
        RTC_CNTL_WDTCONFIG0_REG,
        (config & !RTC_CNTL_WDT_STG0_M) | (RTC_WDT_STG_SEL_OFF << RTC_CNTL_WDT_STG0_S),
    );
    hal.clear_bits(RTC_CNTL_WDTCONFIG0_REG, RTC_CNTL_WDT_EN);

    hal.write_reg(RTC_CNTL_WDTWPROTECT_REG, 0);
}
