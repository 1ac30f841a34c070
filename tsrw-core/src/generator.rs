//! Random sample data in the input log format

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::ingest::{EXPECTED_HEADER, FIELD_SEPARATOR};
use crate::parser::TEST_CASE_SEPARATOR;

/// Default file name used by the CLI when none is given
pub const DEFAULT_FILE_NAME: &str = "4d_printer_test_data.csv";

/// Default number of data lines
pub const DEFAULT_LINES: usize = 10_000;

const REQUIREMENT_PREFIXES: &[&str] = &[
    "Motor", "Heating", "Sensor", "Control", "Navigation", "Power", "Safety", "Fan", "Display",
    "Battery", "Button", "Software", "Firmware", "Voltage", "Temperature", "Alignment", "Rotation",
    "Signal", "Material", "Nozzle", "Extruder", "Platform", "Cooling", "Layer", "Calibration",
    "Axis", "Timing", "Feed", "Transformation", "Frame", "Support", "Mechanism", "Logic",
    "Synchronization", "Profile", "Encoder", "Drive", "Tracking", "Actuator", "Diagnostics",
    "Flow", "Processing", "Transport", "Detection",
];

const REQUIREMENT_NOUNS: &[&str] = &[
    "Unit", "Module", "System", "Array", "Controller", "Processor", "Sensor", "Motor", "Heater",
    "Fan", "Battery", "Display", "Button", "Housing", "Frame", "Algorithm", "Protocol", "Response",
    "Calibration", "PrintHead", "MotionPlatform", "LayerFormation", "FlowControl",
    "TimingMechanism", "TransformSequence", "SupportStructure", "TemperatureProfile",
    "MaterialFeed", "StressResponse", "FlexibilityControl", "MotionAxis", "PositionEncoder",
    "SafetyCircuit", "ErrorHandler", "TimingController", "DriveSystem", "FeedbackLoop",
    "SynchronizationUnit", "CoolingModule", "FirmwareModule",
];

const TEST_CASE_NOUNS: &[&str] = &[
    "Check", "Test", "Verification", "Analysis", "Simulation", "Alignment", "Responsiveness",
    "Sequence", "EfficiencyTest", "SelfTest", "Function", "Mitigation", "Detection", "FlowRate",
    "Prevention", "Delivery", "CleanlinessCheck", "ConversionEfficiency", "Alarm", "Resolution",
    "Retrieval", "Interaction", "Integration", "Lock", "Containment", "TimeoutTest", "StartupTest",
    "ShutdownTest", "StressTest", "RecoveryTest", "LoadTest", "MaterialTransformationTest",
    "LayerTimingCheck", "PlatformLevelingCheck", "TemperatureRampTest", "AxisMotionTest",
    "VibrationTest", "ThermalExpansionTest", "SignalStabilityCheck", "FirmwareUpdateTest",
    "DataLoggingVerification", "DiagnosticsTest", "EmergencyStopTest", "OverloadTest",
    "VoltageDropTest", "ResponseTimeCheck", "PositionAccuracyTest", "PrintQualityAnalysis",
];

const TIME_UNITS: &[&str] = &[
    "hr", "hour", "min", "sec", "s", "ms", "millisecond", "ns", "nanosecond",
];

const STATUS_OPTIONS: &[&str] = &["Passed", "Failed", "Unknown"];

fn pick<R: Rng + ?Sized>(rng: &mut R, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

fn requirement<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut requirement = String::new();
    if rng.gen_bool(0.5) {
        requirement.push_str(&format!("{}_", rng.gen_range(1..=100)));
    }
    requirement.push_str(pick(rng, REQUIREMENT_PREFIXES));
    requirement.push_str(pick(rng, REQUIREMENT_NOUNS));
    if rng.gen_bool(0.5) {
        requirement.push_str(&format!("_{}", rng.gen_range(1..=10)));
    }
    requirement
}

/// One or two components with distinct units
fn duration<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.gen_range(1..=2);
    TIME_UNITS
        .choose_multiple(rng, count)
        .map(|unit| format!("{} {}", rng.gen_range(1..=100), unit))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes the header and `lines` random data lines
pub fn generate<W: Write, R: Rng + ?Sized>(
    writer: &mut W,
    lines: usize,
    rng: &mut R,
) -> Result<()> {
    let separator = FIELD_SEPARATOR.to_string();
    writeln!(writer, "{}", EXPECTED_HEADER.join(&separator))?;

    for _ in 0..lines {
        let test_case = format!(
            "{}{}{}",
            requirement(rng),
            TEST_CASE_SEPARATOR,
            pick(rng, TEST_CASE_NOUNS)
        );
        writeln!(
            writer,
            "{}{sep}{}{sep}{}",
            test_case,
            duration(rng),
            pick(rng, STATUS_OPTIONS),
            sep = FIELD_SEPARATOR
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Generates a sample file at `path`, creating parent directories as needed
pub fn generate_file(path: &Path, lines: usize) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create sample file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    generate(&mut writer, lines, &mut rand::thread_rng())
}
