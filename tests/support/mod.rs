pub mod workbench_env;
