//! Prints the `ReleaseUpgrade` CustomResourceDefinition as YAML.
//!
//! Usage: `cargo run -p crds --bin crdgen > config/crd/releaseupgrades.yaml`

use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    println!("---");
    print!("{}", serde_yaml::to_string(&crds::ReleaseUpgrade::crd())?);
    Ok(())
}
