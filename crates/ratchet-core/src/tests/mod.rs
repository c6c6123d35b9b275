mod chance;
mod factor;
mod period;
