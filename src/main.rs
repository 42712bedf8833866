//! # img-hash CLI
//!
//! Command-line interface for computing and comparing dHashes.
//!
//! ## Usage
//! ```bash
//! img-hash hash photo.jpg --rgb
//! img-hash compare photo.jpg 9114861776524122264
//! img-hash scan ~/Photos --threshold 8 --output json
//! ```

mod cli;

use img_hasher::Result;

fn main() -> Result<()> {
    img_hasher::init_tracing();
    cli::run()
}
