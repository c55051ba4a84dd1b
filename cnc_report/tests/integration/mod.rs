mod catalog;
mod plugin_chain;
mod startup;
mod status_stream;
