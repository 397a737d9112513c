use anyhow::Result;

#[cfg(feature = "cli")]
mod main {
    use super::*;
    use clap::{Args, Parser, Subcommand};
    use stereo_math::{
        Degrees, Matrix4,
        projection::projection,
        register::shader_constant_definitions,
        stereo::{StereoPair, projection_stereo_pair, stereo_multiplier, stereo_multiplier_inverse},
    };

    #[derive(Debug, Parser)]
    #[command(about = "Stereoscopic projection matrix calculator", long_about = None)]
    struct Cli {
        #[command(subcommand)]
        command: Command,

        /// Print the matrices as shader constant definitions starting at this
        /// register instead of as a table
        #[arg(long, global = true)]
        registers: Option<usize>,
    }

    #[derive(Debug, Subcommand)]
    enum Command {
        /// Print a perspective projection matrix
        Projection(ProjectionArgs),
        /// Print the left and right eye projection matrices
        StereoPair {
            #[command(flatten)]
            projection: ProjectionArgs,

            #[command(flatten)]
            stereo: StereoArgs,
        },
        /// Print the matrix that adds the stereo correction to a projection
        Multiplier {
            /// Distance to the near plane
            #[arg(long)]
            near: f64,

            /// Distance to the far plane
            #[arg(long)]
            far: f64,

            #[command(flatten)]
            stereo: StereoArgs,

            /// Print the matrix removing the correction instead
            #[arg(long)]
            inverse: bool,
        },
    }

    #[derive(Debug, Args)]
    struct ProjectionArgs {
        /// Distance to the near plane
        #[arg(long)]
        near: f64,

        /// Distance to the far plane
        #[arg(long)]
        far: f64,

        /// Horizontal field of view in degrees
        #[arg(long)]
        fov_h: f64,

        /// Vertical field of view in degrees
        #[arg(long)]
        fov_v: f64,
    }

    #[derive(Debug, Args)]
    struct StereoArgs {
        /// Eye separation in clip space
        #[arg(long, allow_negative_numbers = true)]
        separation: f64,

        /// View depth at which the eyes converge
        #[arg(long)]
        convergence: f64,
    }

    pub fn main() -> Result<()> {
        env_logger::init();

        let cli = Cli::parse();

        match cli.command {
            Command::Projection(ProjectionArgs {
                near,
                far,
                fov_h,
                fov_v,
            }) => {
                let m = projection(near, far, Degrees(fov_h), Degrees(fov_v))?;
                print_matrix(&m, cli.registers);
            }
            Command::StereoPair {
                projection: perspective,
                stereo,
            } => {
                let StereoPair { left, right } = projection_stereo_pair(
                    perspective.near,
                    perspective.far,
                    Degrees(perspective.fov_h),
                    Degrees(perspective.fov_v),
                    stereo.separation,
                    stereo.convergence,
                )?;
                println!("Left:");
                print_matrix(&left, cli.registers);
                println!("Right:");
                // The right eye follows the left one in the register file
                print_matrix(&right, cli.registers.map(|first| first + 4));
            }
            Command::Multiplier {
                near,
                far,
                stereo,
                inverse,
            } => {
                let m = if inverse {
                    stereo_multiplier_inverse(near, far, stereo.separation, stereo.convergence)?
                } else {
                    stereo_multiplier(near, far, stereo.separation, stereo.convergence)?
                };
                print_matrix(&m, cli.registers);
            }
        }
        Ok(())
    }

    fn print_matrix(m: &Matrix4, first_register: Option<usize>) {
        match first_register {
            Some(first_register) => {
                for line in shader_constant_definitions(m, first_register) {
                    println!("{line}");
                }
            }
            None => print!("{m}"),
        }
    }
}

#[cfg(not(feature = "cli"))]
mod main {
    use super::*;

    pub fn main() -> Result<()> {
        anyhow::bail!("This binary requires the `cli` feature to be enabled.")
    }
}

fn main() -> Result<()> {
    main::main()
}
