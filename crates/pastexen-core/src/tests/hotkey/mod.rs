mod combo;
