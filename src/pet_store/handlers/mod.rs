pub mod fake_outer_string;
