#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
use als_nightlight::config;
#[cfg(target_os = "none")]
use als_nightlight::control::{Controller, CycleOutcome};
#[cfg(target_os = "none")]
use als_nightlight::led_control::IndicatorLed;
#[cfg(target_os = "none")]
use als_nightlight::ltr303::Ltr303;
#[cfg(target_os = "none")]
use esp_hal::clock::CpuClock;
#[cfg(target_os = "none")]
use esp_hal::delay::Delay;
#[cfg(target_os = "none")]
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
#[cfg(target_os = "none")]
use esp_hal::rmt::Rmt;
#[cfg(target_os = "none")]
use esp_hal::time::Rate;
#[cfg(target_os = "none")]
use esp_hal_smartled::{SmartLedsAdapter, smartLedBuffer};
#[cfg(target_os = "none")]
use esp_println::println;

// Add app descriptor for espflash compatibility
#[cfg(target_os = "none")]
esp_bootloader_esp_idf::esp_app_desc!();

#[cfg(target_os = "none")]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    println!("[MAIN] Panic: {:?}", info);
    loop {}
}

#[cfg(target_os = "none")]
#[esp_hal::main]
fn main() -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_println::logger::init_logger(log::LevelFilter::Info);

    println!("[MAIN] Night light {} starting", als_nightlight::VERSION);

    // I2C bus for the LTR-303
    println!(
        "[ALS] Setting up I2C on SDA=GPIO{} SCL=GPIO{} at {}kHz...",
        config::I2C_SDA_PIN,
        config::I2C_SCL_PIN,
        config::I2C_FREQUENCY_KHZ
    );
    let i2c_config = I2cConfig::default().with_frequency(Rate::from_khz(config::I2C_FREQUENCY_KHZ));
    let i2c = match I2c::new(peripherals.I2C0, i2c_config) {
        Ok(i2c) => i2c
            .with_sda(peripherals.GPIO5)
            .with_scl(peripherals.GPIO6),
        Err(e) => {
            println!("[ALS] ❌ Failed to configure I2C: {:?}", e);
            panic!("I2C initialization failed");
        }
    };
    let sensor = Ltr303::new(i2c, config::SENSOR_I2C_ADDRESS);

    // RMT drives the WS2812 indicator pixel
    println!(
        "[LED] Setting up GPIO pin {} for LED data...",
        config::LED_DATA_PIN
    );
    let rmt = match Rmt::new(peripherals.RMT, Rate::from_mhz(80)) {
        Ok(rmt) => rmt,
        Err(e) => {
            println!("[LED] ❌ Failed to initialize RMT: {:?}", e);
            panic!("RMT initialization failed");
        }
    };
    let rmt_buffer = smartLedBuffer!(1);
    let led_adapter = SmartLedsAdapter::new(rmt.channel0, peripherals.GPIO8, rmt_buffer);
    let led = IndicatorLed::new(led_adapter);

    let mut delay = Delay::new();
    let mut controller = Controller::new(sensor, led);

    let startup = controller.start(&mut delay);
    match startup.part_id {
        Some(id) => println!("[ALS] Part ID: 0x{:02X} (expect 0xA0)", id),
        None => println!("[ALS] ❌ Part ID unreadable"),
    }
    match startup.manufacturer_id {
        Some(id) => println!("[ALS] Manufacturer ID: 0x{:02X} (expect 0x05)", id),
        None => println!("[ALS] ❌ Manufacturer ID unreadable"),
    }
    match startup.control {
        Some(control) => println!("[ALS] ALS_CONTR: 0x{:02X}", control),
        None => println!("[ALS] ❌ Sensor not activated"),
    }
    println!(
        "[ALS] Decoding at gain {:?}, integration {}ms",
        startup.scale.gain,
        startup.scale.integration_time.millis()
    );

    println!(
        "[MAIN] ✅ Sampling every {}ms, threshold {} lux",
        config::SAMPLE_INTERVAL_MS,
        config::LUX_THRESHOLD
    );

    controller.run(&mut delay, |outcome| {
        if let CycleOutcome::Sampled(report) = outcome {
            println!(
                "[ALS] CH0={:5} CH1={:5} lux={:.2} indicator={:?}",
                report.reading.ch0, report.reading.ch1, report.lux, report.state
            );
        }
    })
}

#[cfg(not(target_os = "none"))]
fn main() {
    println!(
        "als-nightlight {} is ESP32-C3 firmware; build it with --target riscv32imc-unknown-none-elf",
        als_nightlight::VERSION
    );
}
