#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = dihedra_io::parse_dssp(data);
    let _ = dihedra_io::parse_mapping(data);
    if let Ok(report) = dihedra_io::parse_tmalign(data) {
        if let Some(block) = report.alignment {
            let residues: Vec<(i32, char)> = (1..=8).map(|n| (n, 'A')).collect();
            let _ = dihedra_io::map_residues(&block, &residues, &residues);
        }
    }
});
