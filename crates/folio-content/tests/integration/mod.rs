mod batch_loading;
mod round_trip;
