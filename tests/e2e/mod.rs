// End-to-end tests for the speech player
//
// Each test gets its own mockito server standing in for the speech provider
// and a recording audio player, so tests run in parallel without a network
// connection or an audio device.
//
// Architecture:
// - GoogleTtsRepository talks HTTP to the per-test mock server
// - SpeechSession sequences catalog, synthesis and playback as in the binary
// - RecordingPlayer counts plays and releases instead of driving a device

mod test_synthesis;
