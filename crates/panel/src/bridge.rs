use foundation::GeoBounds;
use runtime::{VariableCommand, VariableSink, VariableValue};
use tracing::debug;

use crate::features::{Feature, FeatureId};
use crate::options::MapOptions;

/// Variable holding the id of the selected feature.
pub const SELECTED_VAR: &str = "selected";
pub const MIN_LAT_VAR: &str = "minLat";
pub const MAX_LAT_VAR: &str = "maxLat";
pub const MIN_LON_VAR: &str = "minLon";
pub const MAX_LON_VAR: &str = "maxLon";

/// Forwards map interactions to the host's variable store.
///
/// Holds no state of its own; every call maps one event to at most one
/// command.
pub struct Bridge<'a, S: VariableSink> {
    options: &'a MapOptions,
    sink: S,
}

impl<'a, S: VariableSink> Bridge<'a, S> {
    pub fn new(options: &'a MapOptions, sink: S) -> Self {
        Self { options, sink }
    }

    /// A feature was clicked. A feature without an id clears the selection;
    /// a numeric id is written back as a number.
    pub fn on_select(&mut self, feature: &Feature) {
        let value = feature
            .id
            .as_ref()
            .map_or(VariableValue::Unset, FeatureId::to_variable);
        self.sink.send(select_command(value));
    }

    /// The viewport settled after a pan or zoom.
    pub fn on_viewport_change(&mut self, bounds: GeoBounds) {
        if !self.options.use_bounds_in_query {
            return;
        }
        if !bounds.is_valid() {
            debug!(?bounds, "ignoring invalid viewport bounds");
            return;
        }
        self.sink.send(bounds_command(bounds));
    }

    /// First layout of the map; publishes the initial viewport so dependent
    /// panels do not wait for the first pan.
    pub fn on_mount(&mut self, initial_bounds: GeoBounds) {
        self.on_viewport_change(initial_bounds);
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Write of the selected id; `Option<&str>` ids convert directly.
pub fn select_command(id: impl Into<VariableValue>) -> VariableCommand {
    VariableCommand::set(SELECTED_VAR, id)
}

pub fn bounds_command(bounds: GeoBounds) -> VariableCommand {
    VariableCommand::batch([
        (MIN_LAT_VAR, VariableValue::Number(bounds.min_lat())),
        (MAX_LAT_VAR, VariableValue::Number(bounds.max_lat())),
        (MIN_LON_VAR, VariableValue::Number(bounds.min_lon())),
        (MAX_LON_VAR, VariableValue::Number(bounds.max_lon())),
    ])
}
