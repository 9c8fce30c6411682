//! Integration tests for the qgis-plugin-ci binary

mod helpers;
mod test_changelog;
mod test_stamp;
