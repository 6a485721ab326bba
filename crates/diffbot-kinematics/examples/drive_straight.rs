use diffbot_kinematics::*;

fn main() {
    let config = RobotConfig::default();
    let boundary = Boundary::default();
    let start = boundary.center();
    let robot_result = DifferentialDriveState::new(&config, boundary, Pose::new(start.x, start.y, 0.0));

    let voltage = 1.5; // Volts on both motors
    let dt = 0.1; // Time step in seconds
    let num_steps = 10;

    match robot_result {
        Ok(mut robot) => {
            println!("Initializing simulation...");
            println!("  Robot Parameters:");
            println!("    Wheel Radius: {} m", config.wheel_radius);
            println!("    Axle Length:  {} m", config.axle_length);
            println!("    Motor kv:     {} RPM/V", config.motor_kv);
            println!("  Initial State:");
            println!("    Pose:         {}", robot.pose());
            println!("  Simulation Settings:");
            println!("    Voltage:      {} V", voltage);
            println!("    Time Step:    {} s", dt);
            println!("    Num Steps:    {}", num_steps);
            println!("\nSimulating...");

            robot.set_voltages(voltage, voltage);
            for i in 0..num_steps {
                match robot.step(dt) {
                    Ok(speeds) => {
                        println!("Step {:>2}: Pose: {} Speeds: {}", i + 1, robot.pose(), speeds);
                    }
                    Err(e) => {
                        eprintln!("Error during simulation step {}: {}", i + 1, e);
                        break;
                    }
                }
            }

            println!("\nSimulation complete.");
            println!("Final Pose: {:?}", robot.pose());
        }
        Err(e) => {
            eprintln!("Failed to initialize robot: {}", e);
        }
    }
}
