//! The slice of the ESP32 register map used by the identity and restart
//! paths. Addresses and field layouts match the ESP-IDF `soc` headers.

// From <https://github.com/espressif/esp-idf/blob/master/components/soc/esp32/include/soc/soc.h>
pub const DR_REG_DPORT_BASE: u32 = 0x3ff0_0000;
pub const DR_REG_UART_BASE: u32 = 0x3ff4_0000;
pub const DR_REG_GPIO_BASE: u32 = 0x3ff4_4000;
pub const DR_REG_RTCCNTL_BASE: u32 = 0x3ff4_8000;
pub const DR_REG_UART1_BASE: u32 = 0x3ff5_0000;
pub const DR_REG_EFUSE_BASE: u32 = 0x3ff5_a000;
pub const DR_REG_TIMERGROUP0_BASE: u32 = 0x3ff5_f000;
pub const DR_REG_TIMERGROUP1_BASE: u32 = 0x3ff6_0000;
pub const DR_REG_UART2_BASE: u32 = 0x3ff6_e000;

// eFuse BLK0 words 1 and 2 carry the factory MAC and its CRC.
pub const EFUSE_BLK0_RDATA1_REG: u32 = DR_REG_EFUSE_BASE + 0x004;
pub const EFUSE_BLK0_RDATA2_REG: u32 = DR_REG_EFUSE_BASE + 0x008;

// RTC_CNTL_OPTIONS0: per-core software reset strobes and the low bits of the
// stall pattern. The other stall bits live in SW_CPU_STALL below.
pub const RTC_CNTL_OPTIONS0_REG: u32 = DR_REG_RTCCNTL_BASE + 0x000;
pub const RTC_CNTL_SW_PROCPU_RST: u32 = 1 << 5;
pub const RTC_CNTL_SW_APPCPU_RST: u32 = 1 << 4;
pub const RTC_CNTL_SW_STALL_PROCPU_C0_M: u32 = 0x3 << 2;
pub const RTC_CNTL_SW_STALL_PROCPU_C0_S: u32 = 2;
pub const RTC_CNTL_SW_STALL_APPCPU_C0_M: u32 = 0x3;
pub const RTC_CNTL_SW_STALL_APPCPU_C0_S: u32 = 0;

pub const RTC_CNTL_CLK_CONF_REG: u32 = DR_REG_RTCCNTL_BASE + 0x070;
pub const RTC_CNTL_SOC_CLK_SEL_M: u32 = 0x3 << 27;
pub const RTC_CNTL_ANA_CLK_RTC_SEL_M: u32 = 0x3 << 30;
pub const RTC_CNTL_ANA_CLK_RTC_SEL_S: u32 = 30;

// RTC watchdog block. Configuration registers are write-protected; writing
// the key unlocks them, writing anything else relocks them.
// From <https://github.com/espressif/esp-idf/blob/master/components/soc/esp32/include/soc/rtc_cntl_reg.h>
pub const RTC_CNTL_WDTCONFIG0_REG: u32 = DR_REG_RTCCNTL_BASE + 0x08c;
pub const RTC_CNTL_WDTCONFIG1_REG: u32 = DR_REG_RTCCNTL_BASE + 0x090;
pub const RTC_CNTL_WDTFEED_REG: u32 = DR_REG_RTCCNTL_BASE + 0x0a0;
pub const RTC_CNTL_WDTWPROTECT_REG: u32 = DR_REG_RTCCNTL_BASE + 0x0a4;
pub const RTC_CNTL_WDT_WKEY_VALUE: u32 = 0x50d8_3aa1;

pub const RTC_CNTL_WDT_EN: u32 = 1 << 31;
pub const RTC_CNTL_WDT_STG0_M: u32 = 0x7 << 28;
pub const RTC_CNTL_WDT_STG0_S: u32 = 28;
pub const RTC_CNTL_WDT_STG1_S: u32 = 25;
pub const RTC_CNTL_WDT_CPU_RESET_LENGTH_S: u32 = 14;
pub const RTC_CNTL_WDT_SYS_RESET_LENGTH_S: u32 = 11;
pub const RTC_CNTL_WDT_FLASHBOOT_MOD_EN: u32 = 1 << 10;

// Watchdog stage actions, from <https://github.com/espressif/esp-idf/blob/master/components/esp_rom/include/esp32/rom/rtc.h>
pub const RTC_WDT_STG_SEL_OFF: u32 = 0;
pub const RTC_WDT_STG_SEL_RESET_SYSTEM: u32 = 3;
pub const RTC_WDT_STG_SEL_RESET_RTC: u32 = 4;

pub const RTC_CNTL_SW_CPU_STALL_REG: u32 = DR_REG_RTCCNTL_BASE + 0x0ac;
pub const RTC_CNTL_SW_STALL_PROCPU_C1_M: u32 = 0x3f << 26;
pub const RTC_CNTL_SW_STALL_PROCPU_C1_S: u32 = 26;
pub const RTC_CNTL_SW_STALL_APPCPU_C1_M: u32 = 0x3f << 20;
pub const RTC_CNTL_SW_STALL_APPCPU_C1_S: u32 = 20;

// Timer-group watchdogs share the write-protect key with the RTC watchdog.
pub const TIMG_WDTCONFIG0_OFFSET: u32 = 0x048;
pub const TIMG_WDTWPROTECT_OFFSET: u32 = 0x064;
pub const TIMG_WDT_EN: u32 = 1 << 31;
pub const TIMG_WDT_WKEY_VALUE: u32 = 0x50d8_3aa1;

// Peripheral input-signal routing; one 32-bit select register per signal.
pub const GPIO_FUNC0_IN_SEL_CFG_REG: u32 = DR_REG_GPIO_BASE + 0x130;
pub const GPIO_FUNC_IN_SEL_CFG_STRIDE: u32 = 4;

// DPORT reset/control registers.
// From <https://github.com/espressif/esp-idf/blob/master/components/soc/esp32/include/soc/dport_reg.h>
pub const DPORT_APPCPU_CTRL_D_REG: u32 = DR_REG_DPORT_BASE + 0x038;
pub const DPORT_CPU_PER_CONF_REG: u32 = DR_REG_DPORT_BASE + 0x03c;
pub const DPORT_PRO_CACHE_CTRL_REG: u32 = DR_REG_DPORT_BASE + 0x040;
pub const DPORT_APP_CACHE_CTRL_REG: u32 = DR_REG_DPORT_BASE + 0x058;
pub const DPORT_CACHE_ENABLE: u32 = 1 << 3;
pub const DPORT_PERIP_RST_EN_REG: u32 = DR_REG_DPORT_BASE + 0x0c4;
pub const DPORT_CORE_RST_EN_REG: u32 = DR_REG_DPORT_BASE + 0x0d0;

pub const DPORT_BB_RST: u32 = 1 << 0;
pub const DPORT_FE_RST: u32 = 1 << 1;
pub const DPORT_MAC_RST: u32 = 1 << 2;
pub const DPORT_BT_RST: u32 = 1 << 3;
pub const DPORT_BTMAC_RST: u32 = 1 << 4;
pub const DPORT_SDIO_RST: u32 = 1 << 5;
pub const DPORT_SDIO_HOST_RST: u32 = 1 << 6;
pub const DPORT_EMAC_RST: u32 = 1 << 7;
pub const DPORT_MACPWR_RST: u32 = 1 << 8;
pub const DPORT_RW_BTMAC_RST: u32 = 1 << 9;
pub const DPORT_RW_BTLP_RST: u32 = 1 << 10;

pub const DPORT_TIMERS_RST: u32 = 1 << 0;
pub const DPORT_SPI01_RST: u32 = 1 << 1;
pub const DPORT_UART_RST: u32 = 1 << 2;

// UART status, used when draining TX FIFOs before reset.
pub const UART_STATUS_OFFSET: u32 = 0x01c;
pub const UART_TXFIFO_CNT_M: u32 = 0xff << 16;
pub const UART_ST_UTX_OUT_M: u32 = 0xf << 24;
