pub mod evaluate_renewals_cmd;
