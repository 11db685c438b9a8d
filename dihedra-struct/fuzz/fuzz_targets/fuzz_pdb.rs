#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(models) = dihedra_struct::parse_pdb_models(data) {
        for model in &models {
            for chain in &model.chains {
                let _ = dihedra_struct::chain_angles(chain);
                let _ = dihedra_struct::parse_pdb(&dihedra_struct::write_chain(chain));
            }
        }
    }
});
