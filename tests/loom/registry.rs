use lateral::sync::AtomicRegistry;
use lateral::sync::ReaderRegistry;
use loom::sync::atomic::AtomicBool;
use loom::sync::atomic::Ordering;
use loom::thread;
use triomphe::Arc;

#[test]
fn empty_never_true_with_reader_inside() {
  loom::model(|| {
    let registry: Arc<AtomicRegistry> = Arc::new(AtomicRegistry::new());
    let release: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));

    let reader = {
      let registry: Arc<AtomicRegistry> = Arc::clone(&registry);
      let release: Arc<AtomicBool> = Arc::clone(&release);

      thread::spawn(move || {
        registry.arrive();

        while !release.load(Ordering::Acquire) {
          thread::yield_now();
        }

        registry.depart();
      })
    };

    // Wait for the arrival, then probe: the reader is pinned inside
    // its section until we let it go, so emptiness must not show.
    while registry.empty() {
      thread::yield_now();
    }

    assert!(!registry.empty());

    release.store(true, Ordering::Release);
    reader.join().unwrap();

    assert!(registry.empty());
  });
}

#[test]
fn balanced_marks_drain() {
  loom::model(|| {
    let registry: Arc<AtomicRegistry> = Arc::new(AtomicRegistry::new());

    let one = {
      let registry: Arc<AtomicRegistry> = Arc::clone(&registry);

      thread::spawn(move || {
        registry.arrive();
        registry.depart();
      })
    };

    let two = {
      let registry: Arc<AtomicRegistry> = Arc::clone(&registry);

      thread::spawn(move || {
        registry.arrive();
        registry.arrive();
        registry.depart();
        registry.depart();
      })
    };

    one.join().unwrap();
    two.join().unwrap();

    assert!(registry.empty());
  });
}
