//! # CRD Generator
//!
//! Generates the Kubernetes CustomResourceDefinition YAML for the `Dummy`
//! resource from its Rust type definition.
//!
//! ## Usage
//!
//! ```bash
//! # Generate CRD YAML
//! cargo run --bin crdgen > config/crd/dummy.yaml
//!
//! # Generate and apply directly
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use dummy_controller::crd::Dummy;
use kube::core::CustomResourceExt;

fn main() {
    let crd = Dummy::crd();

    match serde_yaml::to_string(&crd) {
        Ok(yaml) => {
            print!("{yaml}");
        }
        Err(err) => {
            eprintln!("Failed to serialize CRD to YAML: {err}");
            std::process::exit(1);
        }
    }
}
