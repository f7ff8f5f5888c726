//! End-to-end flow: seal, reveal from cache, lock, re-prompt, wrong passphrase.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::EncryptedSecret;
use secrecy::SecretString;
use vault::credentials::{
    CredentialError, CredentialService, PassphrasePrompt, PromptError, PromptReason,
};
use vault::session::PassphraseSession;
use vault::shell::Shell;

/// Replays canned answers and records the reasons it was asked with.
#[derive(Clone, Default)]
struct ScriptedPrompt {
    answers: Arc<Mutex<VecDeque<Option<&'static str>>>>,
    asked: Arc<Mutex<Vec<PromptReason>>>,
}

impl ScriptedPrompt {
    fn with_answers(answers: &[Option<&'static str>]) -> Self {
        let prompt = Self::default();
        prompt.answers.lock().unwrap().extend(answers.iter().copied());
        prompt
    }

    fn asked(&self) -> Vec<PromptReason> {
        self.asked.lock().unwrap().clone()
    }
}

impl PassphrasePrompt for ScriptedPrompt {
    fn prompt(&self, reason: PromptReason) -> Result<Option<SecretString>, PromptError> {
        self.asked.lock().unwrap().push(reason);
        match self.answers.lock().unwrap().pop_front() {
            Some(answer) => Ok(answer.map(SecretString::from)),
            None => Err(PromptError::NoTerminal),
        }
    }
}

#[tokio::test]
async fn seal_reveal_lock_and_reprompt() {
    let prompt = ScriptedPrompt::with_answers(&[Some("correct-horse"), Some("correct-horse")]);
    let session = PassphraseSession::new(Duration::from_secs(300));
    let service = CredentialService::new(session.clone(), prompt.clone(), 3);

    // First seal asks for the passphrase and caches it.
    let sealed = service.seal("MyS3cret!").await.unwrap();
    assert_eq!(sealed.iv.len(), 32);
    assert!(session.has_valid_passphrase().await);

    // Reveal runs from the cache.
    assert_eq!(service.reveal(&sealed).await.unwrap(), "MyS3cret!");
    assert_eq!(prompt.asked(), vec![PromptReason::Encrypt]);

    // After locking, reveal prompts again.
    session.clear_passphrase().await;
    assert_eq!(service.reveal(&sealed).await.unwrap(), "MyS3cret!");
    assert_eq!(
        prompt.asked(),
        vec![PromptReason::Encrypt, PromptReason::Decrypt]
    );
}

#[tokio::test]
async fn legacy_record_with_wrong_passphrase_is_refused() {
    let sealed = vault::crypto::encrypt("a password that spans two blocks", "correct-horse")
        .unwrap();
    let legacy = format!(
        r#"{{"encryptedData":"{}","iv":"{}"}}"#,
        sealed.ciphertext, sealed.iv
    );
    let record = EncryptedSecret::from_json(&legacy).unwrap();

    let prompt =
        ScriptedPrompt::with_answers(&[Some("wrong-pass"), Some("wrong-pass"), Some("wrong-pass")]);
    let service = CredentialService::new(PassphraseSession::default(), prompt.clone(), 3);

    let err = service.reveal(&record).await.unwrap_err();
    assert!(matches!(err, CredentialError::TooManyAttempts { attempts: 3 }));
    assert_eq!(prompt.asked().len(), 3);
    assert!(!service.session().has_valid_passphrase().await);
}

#[tokio::test]
async fn shell_round_trip_over_in_memory_io() {
    let prompt = ScriptedPrompt::with_answers(&[Some("correct-horse")]);
    let service = CredentialService::new(PassphraseSession::default(), prompt.clone(), 3);
    let shell = Shell::new(service, 16);

    let mut output = Vec::new();
    shell
        .run(&b"seal MyS3cret!\nstatus\n"[..], &mut output)
        .await
        .unwrap();
    let output = String::from_utf8(output).unwrap();
    let mut lines = output.lines();

    let record = EncryptedSecret::from_json(lines.next().unwrap()).unwrap();
    assert!(lines.next().unwrap().starts_with("unlocked, passphrase expires in "));

    let script = format!("reveal {} {}\nlock\nstatus\nquit\n", record.ciphertext, record.iv);
    let mut output = Vec::new();
    shell.run(script.as_bytes(), &mut output).await.unwrap();
    let output = String::from_utf8(output).unwrap();

    assert_eq!(output, "MyS3cret!\nlocked\nlocked\n");
    assert_eq!(prompt.asked(), vec![PromptReason::Encrypt]);
}
