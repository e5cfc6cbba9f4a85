// Résumé intake: input validation and the HTTP handlers that drive the
// workflow controller.

pub mod handlers;
pub mod validation;
