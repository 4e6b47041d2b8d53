pub mod shared {
    pub mod core {
        pub mod actor;
        pub mod errors;
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod aggregate_cache;
        pub mod event_bus;
        pub mod sqlite;
    }
}

pub mod modules {
    pub mod directory {
        pub mod core {
            pub mod model;
        }
        pub mod use_cases {
            pub mod manage_directory {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod directory;
                pub mod directory_in_memory;
                pub mod directory_sqlite;
            }
        }
    }

    pub mod time_entries {
        pub mod core {
            pub mod decide;
            pub mod events;
            pub mod time_entry;
        }
        pub mod use_cases {
            pub mod log_time_entry {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod update_timesheet_cell {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod weekly_timesheet {
                pub mod handler;
                pub mod view;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod time_entry_log;
                pub mod time_entry_log_in_memory;
                pub mod time_entry_log_sqlite;
            }
        }
    }

    pub mod datalake {
        pub mod core {
            pub mod apply;
            pub mod buckets;
            pub mod datalake_entry;
        }
        pub mod use_cases {
            pub mod project_time_entries {
                pub mod projector;
            }
            pub mod rebuild_datalake {
                pub mod handler;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod datalake_in_memory;
                pub mod datalake_repository;
                pub mod datalake_sqlite;
            }
        }
    }

    pub mod reporting {
        pub mod core {
            pub mod csv;
            pub mod filters;
            pub mod rows;
            pub mod stats_query;
        }
        pub mod use_cases {
            pub mod aggregate_stats {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod time_entry_report {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod inbound {
                pub mod query_params;
            }
            pub mod outbound {
                pub mod reporting_queries;
                pub mod reporting_queries_in_memory;
                pub mod reporting_queries_sqlite;
            }
        }
    }
}

pub mod shell;

#[cfg(test)]
pub mod tests {
    pub mod fixtures;

    pub mod e2e {
        pub mod reporting_tests;
        pub mod time_entry_log_tests;
    }
}
