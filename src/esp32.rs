//! Implementations of the [`crate::hal`] traits on real ESP32 silicon.

use core::{arch::asm, ptr};

use crate::{
    hal::{Abort, CoreControl, Cpu, EfuseBlock0, RegisterBus, SystemControl},
    mac::{AddressPolicy, MacStore},
    soc::*,
};

/// One-time construction of the process-wide identity store. Call during
/// early boot, before any interface reads an address.
pub fn mac_store(policy: AddressPolicy) -> &'static mut MacStore {
    crate::mk_static!(MacStore, MacStore::new(policy))
}

#[inline(always)]
fn reg_read(addr: u32) -> u32 {
    unsafe { ptr::read_volatile(addr as *const u32) }
}

#[inline(always)]
fn reg_write(addr: u32, value: u32) {
    unsafe { ptr::write_volatile(addr as *mut u32, value) }
}

pub struct Esp32System;

impl Esp32System {
    pub const fn new() -> Self {
        Self
    }

    fn write_field(&mut self, addr: u32, mask: u32, shift: u32, value: u32) {
        let current = self.read_reg(addr);
        self.write_reg(addr, (current & !mask) | (value << shift));
    }
}

impl RegisterBus for Esp32System {
    fn read_reg(&mut self, addr: u32) -> u32 {
        reg_read(addr)
    }

    fn write_reg(&mut self, addr: u32, value: u32) {
        reg_write(addr, value);
    }
}

impl CoreControl for Esp32System {
    fn current_core(&self) -> Cpu {
        let prid: u32;
        unsafe { asm!("rsr.prid {0}", out(reg) prid, options(nostack, nomem)) };

        // Bit 13 of PRID distinguishes the two cores.
        if prid >> 13 & 1 == 0 {
            Cpu::Pro
        } else {
            Cpu::App
        }
    }

    fn mask_interrupts(&mut self) {
        unsafe { asm!("wsr.intenable {0}", "rsync", in(reg) 0u32, options(nostack)) };
    }

    fn reset_core(&mut self, core: Cpu) {
        let strobe = match core {
            Cpu::Pro => RTC_CNTL_SW_PROCPU_RST,
            Cpu::App => RTC_CNTL_SW_APPCPU_RST,
        };
        self.set_bits(RTC_CNTL_OPTIONS0_REG, strobe);
    }

    fn stall_core(&mut self, core: Cpu) {
        // The stall pattern is split across two registers: 0x21 in the C1
        // field and 0x2 in the C0 field engage the stall logic.
        match core {
            Cpu::Pro => {
                self.write_field(
                    RTC_CNTL_SW_CPU_STALL_REG,
                    RTC_CNTL_SW_STALL_PROCPU_C1_M,
                    RTC_CNTL_SW_STALL_PROCPU_C1_S,
                    0x21,
                );
                self.write_field(
                    RTC_CNTL_OPTIONS0_REG,
                    RTC_CNTL_SW_STALL_PROCPU_C0_M,
                    RTC_CNTL_SW_STALL_PROCPU_C0_S,
                    0x2,
                );
            }
            Cpu::App => {
                self.write_field(
                    RTC_CNTL_SW_CPU_STALL_REG,
                    RTC_CNTL_SW_STALL_APPCPU_C1_M,
                    RTC_CNTL_SW_STALL_APPCPU_C1_S,
                    0x21,
                );
                self.write_field(
                    RTC_CNTL_OPTIONS0_REG,
                    RTC_CNTL_SW_STALL_APPCPU_C0_M,
                    RTC_CNTL_SW_STALL_APPCPU_C0_S,
                    0x2,
                );
            }
        }
    }

    fn unstall_core(&mut self, core: Cpu) {
        match core {
            Cpu::Pro => {
                self.write_field(
                    RTC_CNTL_SW_CPU_STALL_REG,
                    RTC_CNTL_SW_STALL_PROCPU_C1_M,
                    RTC_CNTL_SW_STALL_PROCPU_C1_S,
                    0,
                );
                self.write_field(
                    RTC_CNTL_OPTIONS0_REG,
                    RTC_CNTL_SW_STALL_PROCPU_C0_M,
                    RTC_CNTL_SW_STALL_PROCPU_C0_S,
                    0,
                );
            }
            Cpu::App => {
                self.write_field(
                    RTC_CNTL_SW_CPU_STALL_REG,
                    RTC_CNTL_SW_STALL_APPCPU_C1_M,
                    RTC_CNTL_SW_STALL_APPCPU_C1_S,
                    0,
                );
                self.write_field(
                    RTC_CNTL_OPTIONS0_REG,
                    RTC_CNTL_SW_STALL_APPCPU_C0_M,
                    RTC_CNTL_SW_STALL_APPCPU_C0_S,
                    0,
                );
            }
        }
    }
}

impl SystemControl for Esp32System {
    fn abort_shared_bus_access(&mut self) {
        // This crate issues no buffered cross-core DPORT reads of its own;
        // the peer core is stalled by the time this runs, so there is
        // nothing in flight to cancel.
    }

    fn drain_tx(&mut self, uart: u8) {
        let base = match uart {
            0 => DR_REG_UART_BASE,
            1 => DR_REG_UART1_BASE,
            _ => DR_REG_UART2_BASE,
        };

        // Both the FIFO count and the TX state machine must go idle; the
        // FIFO empties one frame before the last stop bit leaves the pin.
        loop {
            let status = reg_read(base + UART_STATUS_OFFSET);
            if status & (UART_TXFIFO_CNT_M | UART_ST_UTX_OUT_M) == 0 {
                break;
            }
        }
    }

    fn disable_cache(&mut self, core: Cpu) {
        let ctrl = match core {
            Cpu::Pro => DPORT_PRO_CACHE_CTRL_REG,
            Cpu::App => DPORT_APP_CACHE_CTRL_REG,
        };
        self.clear_bits(ctrl, DPORT_CACHE_ENABLE);
    }

    fn set_cpu_clock_to_xtal(&mut self) {
        // Select the crystal as CPU clock source (PLL bypass) and drop the
        // divider configuration, matching the cold-reset state.
        let conf = reg_read(RTC_CNTL_CLK_CONF_REG);
        reg_write(RTC_CNTL_CLK_CONF_REG, conf & !RTC_CNTL_SOC_CLK_SEL_M);
        reg_write(DPORT_CPU_PER_CONF_REG, 0);
    }

    fn slow_clock_hz(&self) -> u32 {
        let sel = (reg_read(RTC_CNTL_CLK_CONF_REG) & RTC_CNTL_ANA_CLK_RTC_SEL_M)
            >> RTC_CNTL_ANA_CLK_RTC_SEL_S;

        match sel {
            // External 32 kHz crystal.
            1 => 32_768,
            // Internal 8.5 MHz oscillator divided by 256.
            2 => 8_500_000 / 256,
            // Internal 150 kHz RC oscillator.
            _ => 150_000,
        }
    }

    fn halt(&mut self) -> ! {
        loop {}
    }
}

impl EfuseBlock0 for Esp32System {
    fn mac_words(&self) -> (u32, u32) {
        (
            reg_read(EFUSE_BLK0_RDATA1_REG),
            reg_read(EFUSE_BLK0_RDATA2_REG),
        )
    }
}

impl Abort for Esp32System {
    fn abort(&self) -> ! {
        panic!("system abort");
    }
}
