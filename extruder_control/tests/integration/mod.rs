mod controller;
mod encoder;
mod fault_latch;
mod linearizer;
mod motor_tracking;
mod thermal_regulation;
