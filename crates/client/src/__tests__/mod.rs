mod batching;
mod blocking;
mod helpers;
mod index_handle;
mod poller;
