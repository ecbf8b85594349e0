pub mod program_map;
